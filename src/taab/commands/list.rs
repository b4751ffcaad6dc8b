use crate::commands::CmdResult;
use crate::filter;
use crate::index::index_entries;
use crate::model::Entry;

pub fn run(entries: &[Entry]) -> CmdResult {
    CmdResult::default().with_listed_entries(index_entries(entries))
}

/// Matching entries, each listed under its index in the full list.
pub fn search(entries: &[Entry], query: &str) -> CmdResult {
    CmdResult::default().with_listed_entries(filter::search_indexed(query, entries))
}

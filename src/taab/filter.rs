//! Case-insensitive substring search over an entry's text fields.
//!
//! Every field except the image is searched, each on its own (a query never
//! matches across the boundary between two fields). The result is a new list
//! in store order; the store itself is never touched.

use crate::index::{index_entries, IndexedEntry};
use crate::model::{Entry, Field};

const SEARCHED_FIELDS: &[Field] = &[
    Field::CardId,
    Field::Category,
    Field::Company,
    Field::Institution,
    Field::StudentId,
    Field::Name,
    Field::Phone,
    Field::Address,
    Field::Timestamp,
];

pub fn matches(entry: &Entry, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    SEARCHED_FIELDS
        .iter()
        .any(|field| entry.text(*field).to_lowercase().contains(&needle))
}

pub fn search(query: &str, entries: &[Entry]) -> Vec<Entry> {
    entries
        .iter()
        .filter(|e| matches(e, query))
        .cloned()
        .collect()
}

/// Like [`search`], but each match keeps its index in the full list.
pub fn search_indexed(query: &str, entries: &[Entry]) -> Vec<IndexedEntry> {
    index_entries(entries)
        .into_iter()
        .filter(|ie| matches(&ie.entry, query))
        .collect()
}

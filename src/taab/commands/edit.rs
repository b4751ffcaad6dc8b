use crate::commands::{CmdMessage, CmdResult};
use crate::editor::{Editor, FormUpdate};
use crate::error::Result;
use crate::index::{DisplayIndex, IndexedEntry};
use crate::store::backend::StorageBackend;
use crate::store::EntryStore;

use super::helpers::resolve_index;

pub fn start<B: StorageBackend>(
    editor: &mut Editor,
    store: &EntryStore<B>,
    index: DisplayIndex,
) -> Result<CmdResult> {
    let position = resolve_index(store, index)?;
    let entry = editor.start_edit(store, position)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Editing entry {} ({})",
        index, entry.card_id
    )));
    Ok(result.with_listed_entries(vec![IndexedEntry { index, entry }]))
}

pub fn cancel(editor: &mut Editor) -> CmdResult {
    editor.cancel();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info("Edit cancelled."));
    result
}

pub fn set_form(editor: &mut Editor, update: FormUpdate) -> CmdResult {
    editor.update_form(update);
    CmdResult::default()
}

use crate::commands::{CmdMessage, CmdResult};
use crate::editor::Editor;
use crate::error::Result;
use crate::presenter::Presenter;
use crate::store::backend::StorageBackend;
use crate::store::EntryStore;
use tracing::info;

/// Drops every entry and erases the persistence slot, once confirmed.
pub fn run<B: StorageBackend, P: Presenter + ?Sized>(
    editor: &mut Editor,
    store: &mut EntryStore<B>,
    presenter: &mut P,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let prompt = format!(
        "Are you sure you want to clear all {} saved entries?",
        store.len()
    );
    if !presenter.confirm(&prompt) {
        result.add_message(CmdMessage::info("Clear cancelled."));
        return Ok(result);
    }

    let removed = store.clear()?;
    editor.cancel();
    info!(removed, "entries cleared");
    result.add_message(CmdMessage::success("Auto-saved entries cleared."));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorMode;
    use crate::model::Entry;
    use crate::store::mem_backend::MemBackend;
    use crate::store::DEFAULT_SLOT_KEY;
    use crate::test_utils::ScriptedPresenter;

    fn store_with(ids: &[&str]) -> EntryStore<MemBackend> {
        let (mut store, _) = EntryStore::open(MemBackend::new(), DEFAULT_SLOT_KEY);
        for id in ids {
            store.append(Entry::new(*id)).unwrap();
        }
        store
    }

    #[test]
    fn clears_memory_slot_and_edit() {
        let mut store = store_with(&["A1", "B2"]);
        let mut editor = Editor::new();
        editor.start_edit(&store, 1).unwrap();
        let mut presenter = ScriptedPresenter::answering(&[true]);

        let result = run(&mut editor, &mut store, &mut presenter).unwrap();
        assert!(store.is_empty());
        assert!(store.load().unwrap().is_empty());
        assert_eq!(editor.mode(), EditorMode::Idle);
        assert_eq!(result.messages[0].content, "Auto-saved entries cleared.");
    }

    #[test]
    fn declined_clear_changes_nothing() {
        let mut store = store_with(&["A1"]);
        let mut editor = Editor::new();
        let mut presenter = ScriptedPresenter::answering(&[false]);

        run(&mut editor, &mut store, &mut presenter).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn failed_slot_removal_keeps_entries() {
        let mut store = store_with(&["A1"]);
        store.backend().set_simulate_write_error(true);
        let mut editor = Editor::new();
        let mut presenter = ScriptedPresenter::answering(&[true]);

        assert!(run(&mut editor, &mut store, &mut presenter).is_err());
        assert_eq!(store.len(), 1);
    }
}

use crate::commands::{CmdMessage, CmdResult};
use crate::editor::{Editor, SaveOutcome};
use crate::error::Result;
use crate::index::DisplayIndex;
use crate::model::SchemaVariant;
use crate::store::backend::StorageBackend;
use crate::store::EntryStore;
use tracing::info;

pub fn run<B: StorageBackend>(
    editor: &mut Editor,
    store: &mut EntryStore<B>,
    variant: SchemaVariant,
) -> Result<CmdResult> {
    let outcome = editor.save(store, variant)?;
    let index = DisplayIndex::from_position(outcome.position());
    let card_id = outcome.entry().card_id.clone();

    let mut result = CmdResult::default();
    let verb = match &outcome {
        SaveOutcome::Created { .. } => "added",
        SaveOutcome::Updated { .. } => "updated",
    };
    info!(%index, card_id = %card_id, verb, "entry saved");
    result.add_message(CmdMessage::success(format!(
        "Entry {} {} ({})",
        index, verb, card_id
    )));
    result.add_message(CmdMessage::saved(store.len()));

    let entry = match outcome {
        SaveOutcome::Created { entry, .. } | SaveOutcome::Updated { entry, .. } => entry,
    };
    Ok(result.with_affected_entries(vec![entry]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::editor::FormUpdate;
    use crate::error::TaabError;
    use crate::store::mem_backend::MemBackend;
    use crate::store::DEFAULT_SLOT_KEY;

    fn store() -> EntryStore<MemBackend> {
        EntryStore::open(MemBackend::new(), DEFAULT_SLOT_KEY).0
    }

    #[test]
    fn creates_entry_and_acknowledges_save() {
        let mut store = store();
        let mut editor = Editor::new();
        editor.enter_card_id("A100").unwrap();
        editor.update_form(FormUpdate {
            name: Some("Alice".into()),
            ..FormUpdate::default()
        });

        let result = run(&mut editor, &mut store, SchemaVariant::Generic).unwrap();
        assert_eq!(result.affected_entries.len(), 1);
        assert_eq!(result.messages[0].content, "Entry 1 added (A100)");
        assert_eq!(result.messages[1].content, "Saved 1 entries.");
        assert!(matches!(result.messages[1].level, MessageLevel::Saved { .. }));
    }

    #[test]
    fn updates_entry_in_place() {
        let mut store = store();
        let mut editor = Editor::new();
        editor.enter_card_id("A100").unwrap();
        run(&mut editor, &mut store, SchemaVariant::Generic).unwrap();

        editor.start_edit(&store, 0).unwrap();
        let result = run(&mut editor, &mut store, SchemaVariant::Generic).unwrap();
        assert_eq!(result.messages[0].content, "Entry 1 updated (A100)");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn validation_error_propagates() {
        let mut store = store();
        let mut editor = Editor::new();
        assert!(matches!(
            run(&mut editor, &mut store, SchemaVariant::Generic),
            Err(TaabError::NoCardScanned)
        ));
    }
}

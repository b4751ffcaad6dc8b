use crate::commands::{CmdMessage, CmdResult};
use crate::editor::Editor;
use crate::error::Result;
use crate::index::DisplayIndex;
use crate::presenter::Presenter;
use crate::store::backend::StorageBackend;
use crate::store::EntryStore;

use super::helpers::resolve_indexes;
use tracing::warn;

/// Deletes the given entries, each after its own confirmation.
///
/// Indexes are resolved against the list as it is now, then removed from the
/// highest position down so the remaining ones stay valid. If a removal fails
/// after others went through, the result reports both and the rest are left.
pub fn run<B: StorageBackend, P: Presenter + ?Sized>(
    editor: &mut Editor,
    store: &mut EntryStore<B>,
    indexes: &[DisplayIndex],
    presenter: &mut P,
) -> Result<CmdResult> {
    let mut resolved = resolve_indexes(store, indexes)?;
    resolved.sort_by(|a, b| b.1.cmp(&a.1));
    resolved.dedup_by_key(|(_, position)| *position);

    let mut result = CmdResult::default();
    for (display_index, position) in resolved {
        let deleted = match editor.delete(store, position, presenter) {
            Ok(deleted) => deleted,
            // Nothing removed yet: fail the whole command as usual
            Err(e) if result.affected_entries.is_empty() => return Err(e),
            Err(e) => {
                warn!(
                    %display_index,
                    removed = result.affected_entries.len(),
                    error = %e,
                    "delete stopped part way"
                );
                result.add_message(CmdMessage::error(format!(
                    "Could not delete entry {}: {}",
                    display_index, e
                )));
                break;
            }
        };
        match deleted {
            Some(entry) => {
                result.add_message(CmdMessage::success(format!(
                    "Entry deleted ({}): {}",
                    display_index, entry.card_id
                )));
                result.affected_entries.push(entry);
            }
            None => {
                result.add_message(CmdMessage::info(format!("Kept entry {}", display_index)));
            }
        }
    }

    if !result.affected_entries.is_empty() {
        result.add_message(CmdMessage::saved(store.len()));
    }
    Ok(result)
}

use crate::error::{Result, TaabError};
use crate::index::DisplayIndex;
use crate::store::backend::StorageBackend;
use crate::store::EntryStore;

/// Converts a display index to a store position, checking it exists. An
/// out-of-range error reports the display index as typed.
pub fn resolve_index<B: StorageBackend>(store: &EntryStore<B>, index: DisplayIndex) -> Result<usize> {
    if index.0 == 0 {
        return Err(TaabError::InvalidIndex("indexes start at 1".to_string()));
    }
    let position = index.position();
    if position >= store.len() {
        return Err(TaabError::IndexOutOfRange {
            index: index.0,
            len: store.len(),
        });
    }
    Ok(position)
}

/// Resolves every index against the current list before anything changes.
pub fn resolve_indexes<B: StorageBackend>(
    store: &EntryStore<B>,
    indexes: &[DisplayIndex],
) -> Result<Vec<(DisplayIndex, usize)>> {
    indexes
        .iter()
        .map(|idx| resolve_index(store, *idx).map(|position| (*idx, position)))
        .collect()
}

use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for the persistence slot.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while EntryStore handles the "what" (ordering, mirroring, rollback).
pub trait StorageBackend {
    /// Read the blob stored under `key`.
    /// Returns Ok(None) if nothing has been saved under that key yet.
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_slot(&self, key: &str, blob: &str) -> Result<()>;

    /// Erase the blob. Removing a missing key is not an error.
    fn remove_slot(&self, key: &str) -> Result<()>;

    /// Where the slot lives, for display. A virtual path for MemBackend.
    fn slot_path(&self, key: &str) -> PathBuf;
}

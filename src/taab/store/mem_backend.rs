use super::backend::StorageBackend;
use crate::error::{Result, TaabError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since taab is single-threaded.
/// This lets the `StorageBackend` trait use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    slots: RefCell<HashMap<String, String>>,
    simulate_write_error: RefCell<bool>,
    quota: RefCell<Option<usize>>,
    writes_left: RefCell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose slot already holds `blob`, as if left by an earlier run.
    pub fn with_slot(key: &str, blob: &str) -> Self {
        let backend = Self::new();
        backend
            .slots
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Reject writes larger than `bytes`, like a full browser storage quota.
    pub fn set_quota(&self, bytes: Option<usize>) {
        *self.quota.borrow_mut() = bytes;
    }

    /// Let the next `writes` writes through, then fail every write after.
    pub fn fail_after_writes(&self, writes: usize) {
        *self.writes_left.borrow_mut() = Some(writes);
    }

    /// Raw slot contents, for assertions.
    pub fn raw_slot(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, blob: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(TaabError::PersistenceUnavailable(
                "Simulated write error".to_string(),
            ));
        }
        if let Some(left) = self.writes_left.borrow_mut().as_mut() {
            if *left == 0 {
                return Err(TaabError::PersistenceUnavailable(
                    "Simulated write error".to_string(),
                ));
            }
            *left -= 1;
        }
        if let Some(limit) = *self.quota.borrow() {
            if blob.len() > limit {
                return Err(TaabError::PersistenceUnavailable(format!(
                    "quota exceeded ({} bytes > {} bytes)",
                    blob.len(),
                    limit
                )));
            }
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(TaabError::PersistenceUnavailable(
                "Simulated write error".to_string(),
            ));
        }
        self.slots.borrow_mut().remove(key);
        Ok(())
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}", key))
    }
}

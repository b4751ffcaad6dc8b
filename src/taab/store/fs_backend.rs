use super::backend::StorageBackend;
use crate::error::{Result, TaabError};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Slot-per-file backend: `<root>/<key>.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(unavailable)?;
        }
        Ok(())
    }
}

fn unavailable(e: std::io::Error) -> TaabError {
    TaabError::PersistenceUnavailable(e.to_string())
}

impl StorageBackend for FsBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let blob = fs::read_to_string(path).map_err(unavailable)?;
        Ok(Some(blob))
    }

    fn write_slot(&self, key: &str, blob: &str) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, blob).map_err(unavailable)?;
        if let Err(e) = fs::rename(&tmp_path, self.slot_path(key)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(unavailable(e));
        }
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(unavailable)?;
        }
        Ok(())
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

use super::backend::StorageBackend;
use crate::error::{Result, TaabError};
use crate::model::Entry;
use tracing::{debug, warn};

/// What `EntryStore::open` found in the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored {
    /// Nothing saved yet.
    Empty,
    Entries(usize),
    /// The slot held something that is not an entry list. The store starts
    /// empty; the bad blob is overwritten by the next mutation.
    Corrupt(String),
    /// The slot could not be read at all.
    Unavailable(String),
}

/// The ordered, in-memory entry list, mirrored to one persistence slot.
///
/// Positions are insertion order and are only meaningful until the next
/// mutation. Every mutation rewrites the whole list to the slot; if that
/// write fails the in-memory change is undone and the error is returned.
pub struct EntryStore<B: StorageBackend> {
    backend: B,
    key: String,
    entries: Vec<Entry>,
}

impl<B: StorageBackend> EntryStore<B> {
    /// Restore from the slot at start-up. Never fails: bad or unreadable data
    /// is reported through [`Restored`] and the store starts empty.
    pub fn open(backend: B, key: impl Into<String>) -> (Self, Restored) {
        let mut store = Self {
            backend,
            key: key.into(),
            entries: Vec::new(),
        };

        let restored = match store.load() {
            Ok(entries) if entries.is_empty() => Restored::Empty,
            Ok(entries) => {
                let count = entries.len();
                store.entries = entries;
                Restored::Entries(count)
            }
            Err(TaabError::Serialization(e)) => {
                warn!(key = %store.key, error = %e, "saved entries are corrupt, starting empty");
                Restored::Corrupt(e.to_string())
            }
            Err(e) => {
                warn!(key = %store.key, error = %e, "could not read saved entries");
                Restored::Unavailable(e.to_string())
            }
        };

        (store, restored)
    }

    /// Deserialize whatever the slot holds. An absent slot is an empty list.
    pub fn load(&self) -> Result<Vec<Entry>> {
        match self.backend.read_slot(&self.key)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    pub fn append(&mut self, entry: Entry) -> Result<()> {
        self.entries.push(entry);
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Append many entries with a single mirror write.
    pub fn extend(&mut self, entries: Vec<Entry>) -> Result<usize> {
        let before = self.entries.len();
        let added = entries.len();
        self.entries.extend(entries);
        if let Err(e) = self.persist() {
            self.entries.truncate(before);
            return Err(e);
        }
        Ok(added)
    }

    /// Replace the entry at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, entry: Entry) -> Result<Entry> {
        self.check_index(index)?;
        let previous = std::mem::replace(&mut self.entries[index], entry);
        if let Err(e) = self.persist() {
            self.entries[index] = previous;
            return Err(e);
        }
        Ok(previous)
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<Entry> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        if let Err(e) = self.persist() {
            self.entries.insert(index, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Empty the list and erase the slot. Returns how many entries were dropped.
    pub fn clear(&mut self) -> Result<usize> {
        self.backend.remove_slot(&self.key)?;
        let count = self.entries.len();
        self.entries.clear();
        debug!(key = %self.key, count, "cleared saved entries");
        Ok(count)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(TaabError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.entries)?;
        self.backend.write_slot(&self.key, &blob)?;
        debug!(key = %self.key, count = self.entries.len(), bytes = blob.len(), "mirrored entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fs_backend::FsBackend;
    use crate::store::mem_backend::MemBackend;
    use crate::store::DEFAULT_SLOT_KEY;

    fn entry(id: &str) -> Entry {
        Entry::new(id)
    }

    fn ids<B: StorageBackend>(store: &EntryStore<B>) -> Vec<String> {
        store.entries().iter().map(|e| e.card_id.clone()).collect()
    }

    fn open_mem() -> EntryStore<MemBackend> {
        EntryStore::open(MemBackend::new(), DEFAULT_SLOT_KEY).0
    }

    #[test]
    fn open_on_empty_slot_is_empty() {
        let (store, restored) = EntryStore::open(MemBackend::new(), DEFAULT_SLOT_KEY);
        assert_eq!(restored, Restored::Empty);
        assert!(store.is_empty());
    }

    #[test]
    fn every_mutation_mirrors_the_whole_list() {
        let mut store = open_mem();
        store.append(entry("A1")).unwrap();
        store.append(entry("A2")).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, store.snapshot());
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn restore_reads_previous_run() {
        let mut store = open_mem();
        store.append(entry("A1")).unwrap();
        let blob = store.backend().raw_slot(DEFAULT_SLOT_KEY).unwrap();

        let (restored_store, restored) =
            EntryStore::open(MemBackend::with_slot(DEFAULT_SLOT_KEY, &blob), DEFAULT_SLOT_KEY);
        assert_eq!(restored, Restored::Entries(1));
        assert_eq!(ids(&restored_store), vec!["A1"]);
    }

    #[test]
    fn corrupt_slot_is_treated_as_no_prior_data() {
        let backend = MemBackend::with_slot(DEFAULT_SLOT_KEY, "{not json");
        let (store, restored) = EntryStore::open(backend, DEFAULT_SLOT_KEY);
        assert!(matches!(restored, Restored::Corrupt(_)));
        assert!(store.is_empty());
        assert!(store.load().is_err());
    }

    #[test]
    fn remove_at_shifts_later_entries_down() {
        let mut store = open_mem();
        for id in ["A1", "A2", "A3"] {
            store.append(entry(id)).unwrap();
        }
        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.card_id, "A2");
        assert_eq!(ids(&store), vec!["A1", "A3"]);
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn replace_keeps_length() {
        let mut store = open_mem();
        store.append(entry("A1")).unwrap();
        store.append(entry("A2")).unwrap();
        let previous = store.replace(0, entry("Z9")).unwrap();
        assert_eq!(previous.card_id, "A1");
        assert_eq!(ids(&store), vec!["Z9", "A2"]);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut store = open_mem();
        store.append(entry("A1")).unwrap();
        assert!(matches!(
            store.replace(1, entry("X")),
            Err(TaabError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(
            store.remove_at(5),
            Err(TaabError::IndexOutOfRange { index: 5, len: 1 })
        ));
        assert_eq!(ids(&store), vec!["A1"]);
    }

    #[test]
    fn failed_write_rolls_back_memory_and_keeps_slot() {
        let mut store = open_mem();
        store.append(entry("A1")).unwrap();
        let before = store.backend().raw_slot(DEFAULT_SLOT_KEY);

        store.backend().set_simulate_write_error(true);
        let err = store.append(entry("A2")).unwrap_err();
        assert!(matches!(err, TaabError::PersistenceUnavailable(_)));
        assert!(store.remove_at(0).is_err());
        assert!(store.replace(0, entry("Z")).is_err());
        assert!(store.extend(vec![entry("B1"), entry("B2")]).is_err());

        assert_eq!(ids(&store), vec!["A1"]);
        assert_eq!(store.backend().raw_slot(DEFAULT_SLOT_KEY), before);
    }

    #[test]
    fn quota_exceeded_is_persistence_unavailable() {
        let mut store = open_mem();
        store.backend().set_quota(Some(16));
        let err = store.append(entry("A-very-long-card-id")).unwrap_err();
        assert!(matches!(err, TaabError::PersistenceUnavailable(ref m) if m.contains("quota")));
        assert!(store.is_empty());
    }

    #[test]
    fn clear_empties_memory_and_slot() {
        let mut store = open_mem();
        store.append(entry("A1")).unwrap();
        assert_eq!(store.clear().unwrap(), 1);
        assert!(store.is_empty());
        assert_eq!(store.backend().raw_slot(DEFAULT_SLOT_KEY), None);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn extend_writes_once_for_many() {
        let mut store = open_mem();
        let added = store
            .extend(vec![entry("A1"), entry("A2"), entry("A3")])
            .unwrap();
        assert_eq!(added, 3);
        assert_eq!(store.load().unwrap().len(), 3);
    }

    #[test]
    fn fs_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        {
            let (mut store, _) = EntryStore::open(FsBackend::new(root.clone()), DEFAULT_SLOT_KEY);
            store.append(entry("A1")).unwrap();
            store.append(entry("A2")).unwrap();
        }
        assert!(root.join("taabEntries.json").exists());

        let (store, restored) = EntryStore::open(FsBackend::new(root.clone()), DEFAULT_SLOT_KEY);
        assert_eq!(restored, Restored::Entries(2));
        assert_eq!(ids(&store), vec!["A1", "A2"]);

        // No temp files left behind
        let leftovers: Vec<_> = std::fs::read_dir(&root)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}

//! # Storage Layer
//!
//! The entry list lives in memory, in an [`EntryStore`], and is mirrored to a
//! single persistence slot after every change. The slot itself sits behind
//! the [`backend::StorageBackend`] trait.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with [`mem_backend::MemBackend`] (no filesystem needed,
//!   and write failures / quota limits can be simulated)
//! - Keep the store's rules (ordering, full-list mirroring, rollback on a
//!   failed write) independent of where the bytes go
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one JSON file per slot key, written atomically
//! - [`mem_backend::MemBackend`]: `RefCell<HashMap>`, for tests
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── taabEntries.json    # The slot: JSON array of entries
//! └── config.json         # Configuration
//! ```
//!
//! There is no incremental write: the whole list is serialized each time.
//! Last write wins.

pub mod backend;
pub mod entry_store;
pub mod fs_backend;
pub mod mem_backend;

pub use entry_store::{EntryStore, Restored};

/// Slot key used unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "taabEntries";

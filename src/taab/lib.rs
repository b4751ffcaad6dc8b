//! # Taab Architecture
//!
//! Taab keeps a log of scanned cards: who the card belongs to, which
//! organisation it is branded for, and when it was seen. The log survives
//! restarts and can be exported to (and imported from) CSV or JSON.
//!
//! Taab is a library with a CLI client, not the other way around. Nothing
//! below the CLI layer touches a terminal.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints tables, asks y/N on stderr      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the store, the editor and the config                │
//! │  - Turns display indexes ("3", "2-4") into positions        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, returns `CmdResult`            │
//! │  - Built on editor.rs, filter.rs and codec.rs               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - EntryStore: ordered entries mirrored to one slot         │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two seams reach outward without doing I/O themselves: [`presenter`]
//! (show rows, confirm, flash a status line) and [`scanner`] (where card ids
//! come from).
//!
//! ## Testing
//!
//! Most tests live next to the command and editor code and run against
//! `MemBackend`. The API tests check dispatch and index handling. The CLI
//! is covered by argument parsing tests and by `tests/cli_flow.rs`, which
//! runs the binary against a temporary `$TAAB_HOME`.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for every operation
//! - [`commands`]: one module per operation
//! - [`editor`]: the capture/edit state machine
//! - [`filter`]: free-text search
//! - [`codec`]: CSV and JSON export/import
//! - [`store`]: the entry store and its persistence backends
//! - [`model`]: `Entry`, categories, fields and schema variants
//! - [`index`]: 1-based display indexes
//! - [`config`]: persisted settings
//! - [`init`]: locating the data directory and wiring the API
//! - [`error`]: error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod filter;
pub mod index;
pub mod init;
pub mod model;
pub mod presenter;
pub mod scanner;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

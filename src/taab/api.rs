//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for all taab operations, whatever the UI.
//!
//! The facade:
//! - **Owns state**: the entry store, the editor, and the active config
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (display-index strings become store positions)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It never prints and never asks anything of a person directly; when a
//! command needs a confirmation it receives a [`Presenter`].
//!
//! ## Generic Over StorageBackend
//!
//! `TaabApi<B: StorageBackend>`:
//! - Production: `TaabApi<FsBackend>`
//! - Testing: `TaabApi<MemBackend>`

use crate::codec::FileFormat;
use crate::commands;
use crate::config::TaabConfig;
use crate::editor::{Editor, FormUpdate};
use crate::error::{Result, TaabError};
use crate::index::{parse_indexes, DisplayIndex};
use crate::model::{Category, SchemaVariant};
use crate::presenter::Presenter;
use crate::scanner::CardScanner;
use crate::store::backend::StorageBackend;
use crate::store::{EntryStore, Restored};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct TaabApi<B: StorageBackend> {
    store: EntryStore<B>,
    editor: Editor,
    config: TaabConfig,
    config_dir: PathBuf,
    restored: Restored,
}

impl<B: StorageBackend> TaabApi<B> {
    /// Opens the store named by `config.storage_key`, restoring whatever the
    /// previous run left there.
    pub fn new(backend: B, config: TaabConfig, config_dir: PathBuf) -> Self {
        let (store, restored) = EntryStore::open(backend, config.storage_key.clone());
        Self {
            store,
            editor: Editor::new(),
            config,
            config_dir,
            restored,
        }
    }

    pub fn store(&self) -> &EntryStore<B> {
        &self.store
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn config(&self) -> &TaabConfig {
        &self.config
    }

    pub fn schema(&self) -> SchemaVariant {
        self.config.schema
    }

    /// Overrides the schema for this session only.
    pub fn set_schema(&mut self, schema: SchemaVariant) {
        self.config.schema = schema;
    }

    pub fn restored(&self) -> &Restored {
        &self.restored
    }

    /// The start-up status line for what was restored.
    pub fn restore_status(&self) -> commands::CmdResult {
        let mut result = commands::CmdResult::default();
        match &self.restored {
            Restored::Empty => {}
            Restored::Entries(n) => {
                result.add_message(CmdMessage::info(format!("Restored {} saved entries.", n)))
            }
            Restored::Corrupt(detail) => result.add_message(CmdMessage::warning(format!(
                "Saved entries could not be read and were ignored: {}",
                detail
            ))),
            Restored::Unavailable(detail) => result.add_message(CmdMessage::warning(format!(
                "Saved entries are unavailable: {}",
                detail
            ))),
        }
        result
    }

    pub fn list(&self) -> Result<commands::CmdResult> {
        Ok(commands::list::run(self.store.entries()))
    }

    pub fn search(&self, query: &str) -> Result<commands::CmdResult> {
        Ok(commands::list::search(self.store.entries(), query))
    }

    pub fn scan_card<S: CardScanner>(&mut self, scanner: &mut S) -> Result<commands::CmdResult> {
        commands::capture::scan(&mut self.editor, scanner)
    }

    pub fn enter_card_id(&mut self, text: &str) -> Result<commands::CmdResult> {
        commands::capture::enter_card_id(&mut self.editor, text)
    }

    pub fn start_edit(&mut self, index: &str) -> Result<commands::CmdResult> {
        let index = parse_index(index)?;
        commands::edit::start(&mut self.editor, &self.store, index)
    }

    pub fn cancel_edit(&mut self) -> Result<commands::CmdResult> {
        Ok(commands::edit::cancel(&mut self.editor))
    }

    pub fn set_form(&mut self, update: FormUpdate) -> Result<commands::CmdResult> {
        Ok(commands::edit::set_form(&mut self.editor, update))
    }

    pub fn attach_image(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::capture::attach_image(&mut self.editor, path)
    }

    pub fn detach_image(&mut self) -> Result<commands::CmdResult> {
        Ok(commands::capture::detach_image(&mut self.editor))
    }

    pub fn save(&mut self) -> Result<commands::CmdResult> {
        commands::save::run(&mut self.editor, &mut self.store, self.config.schema)
    }

    /// Accepts single indexes and ranges ("2-4"). A range reaching past the
    /// last entry is rejected before anything is prompted or removed.
    pub fn delete<I: AsRef<str>, P: Presenter + ?Sized>(
        &mut self,
        indexes: &[I],
        presenter: &mut P,
    ) -> Result<commands::CmdResult> {
        let indexes =
            parse_indexes(indexes, self.store.len()).map_err(TaabError::InvalidIndex)?;
        commands::delete::run(&mut self.editor, &mut self.store, &indexes, presenter)
    }

    pub fn clear<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<commands::CmdResult> {
        commands::clear::run(&mut self.editor, &mut self.store, presenter)
    }

    pub fn import_file(&mut self, path: &Path, dialect: CsvDialect) -> Result<commands::CmdResult> {
        commands::import::run_file(&mut self.store, path, self.config.schema, dialect)
    }

    pub fn import_text(
        &mut self,
        text: &str,
        format: FileFormat,
        dialect: CsvDialect,
    ) -> Result<commands::CmdResult> {
        commands::import::run_text(&mut self.store, text, format, self.config.schema, dialect)
    }

    /// Writes an export file. `include_images` and `out_dir` fall back to the
    /// config, and the export directory to the current one.
    pub fn export(
        &self,
        format: FileFormat,
        include_images: Option<bool>,
        out_dir: Option<&Path>,
    ) -> Result<commands::CmdResult> {
        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        commands::export::run(
            self.store.entries(),
            self.export_options(format, include_images),
            &dir,
            Utc::now(),
        )
    }

    pub fn export_to_string(
        &self,
        format: FileFormat,
        include_images: Option<bool>,
    ) -> Result<commands::CmdResult> {
        commands::export::to_string(
            self.store.entries(),
            self.export_options(format, include_images),
        )
    }

    pub fn fields(&self, category: Option<Category>) -> Result<commands::CmdResult> {
        Ok(commands::fields::run(self.config.schema, category))
    }

    pub fn config_action(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    fn export_options(&self, format: FileFormat, include_images: Option<bool>) -> ExportOptions {
        ExportOptions {
            format,
            variant: self.config.schema,
            include_images: include_images.unwrap_or(self.config.include_images),
        }
    }
}

fn parse_index(input: &str) -> Result<DisplayIndex> {
    DisplayIndex::from_str(input).map_err(TaabError::InvalidIndex)
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::export::ExportOptions;
pub use crate::commands::import::CsvDialect;
pub use commands::{CmdMessage, CmdResult, MessageLevel};

//! # Entry Editor
//!
//! Holds the entry being composed: the captured card id, the form values,
//! and whether a save should create a new entry or overwrite an existing one.
//!
//! ```text
//!            start_edit(i)
//!   Idle ───────────────────▶ Editing(i)
//!    ▲ ▲                         │
//!    │ └──── save / cancel ──────┘
//!    └── save (appends)
//! ```
//!
//! The card id comes either from a reader ([`Editor::begin_scan`]) or from
//! manual entry ([`Editor::enter_card_id`]); whichever happens last wins.
//!
//! Image attachment is an explicit step that finishes before [`Editor::save`]
//! is called. Both take `&mut self`, so a save can never overlap another save
//! or a pending attachment.

use crate::codec::image_data_url;
use crate::error::{Result, TaabError};
use crate::model::{Category, Entry, Field, SchemaVariant};
use crate::presenter::Presenter;
use crate::scanner::CardScanner;
use crate::store::backend::StorageBackend;
use crate::store::EntryStore;
use chrono::Utc;
use std::path::Path;
use tracing::debug;

/// Shortest card id accepted from manual entry.
pub const MANUAL_CARD_ID_MIN_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Idle,
    /// Overwriting the entry at this store position.
    Editing(usize),
}

/// Form values, everything but the card id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub category: Category,
    pub company: String,
    pub institution: String,
    pub student_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Data URL of the attached image, if any.
    pub image: String,
}

impl EntryForm {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            category: entry.category,
            company: entry.company.clone(),
            institution: entry.institution.clone(),
            student_id: entry.student_id.clone(),
            name: entry.name.clone(),
            phone: entry.phone.clone(),
            address: entry.address.clone(),
            image: entry.image.clone(),
        }
    }

    /// Value of a text field on the form. Card id and timestamp are not form
    /// fields and read as empty.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Category => self.category.label(),
            Field::Company => &self.company,
            Field::Institution => &self.institution,
            Field::StudentId => &self.student_id,
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::Image => &self.image,
            Field::CardId | Field::Timestamp => "",
        }
    }
}

/// A partial form change. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct FormUpdate {
    pub category: Option<Category>,
    pub company: Option<String>,
    pub institution: Option<String>,
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl FormUpdate {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.company.is_none()
            && self.institution.is_none()
            && self.student_id.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }

    pub fn apply(self, form: &mut EntryForm) {
        if let Some(category) = self.category {
            form.category = category;
        }
        let text_fields = [
            (self.company, &mut form.company),
            (self.institution, &mut form.institution),
            (self.student_id, &mut form.student_id),
            (self.name, &mut form.name),
            (self.phone, &mut form.phone),
            (self.address, &mut form.address),
        ];
        for (value, slot) in text_fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created { position: usize, entry: Entry },
    Updated { position: usize, entry: Entry },
}

impl SaveOutcome {
    pub fn entry(&self) -> &Entry {
        match self {
            SaveOutcome::Created { entry, .. } | SaveOutcome::Updated { entry, .. } => entry,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            SaveOutcome::Created { position, .. } | SaveOutcome::Updated { position, .. } => {
                *position
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Editor {
    current_card_id: Option<String>,
    mode: EditorMode,
    form: EntryForm,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_card_id(&self) -> Option<&str> {
        self.current_card_id.as_deref()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn update_form(&mut self, update: FormUpdate) {
        update.apply(&mut self.form);
    }

    /// Reads every identifier the reader has for us; the last one wins.
    pub fn begin_scan<S: CardScanner>(&mut self, scanner: &mut S) -> Result<Option<String>> {
        if !scanner.is_available() {
            return Err(TaabError::ScannerUnavailable);
        }
        let mut last = None;
        while let Some(id) = scanner.poll() {
            last = Some(id);
        }
        if let Some(id) = &last {
            self.current_card_id = Some(id.clone());
        }
        Ok(last)
    }

    pub fn enter_card_id(&mut self, text: &str) -> Result<()> {
        let id = text.trim();
        if id.chars().count() < MANUAL_CARD_ID_MIN_LEN {
            return Err(TaabError::CardIdTooShort {
                min: MANUAL_CARD_ID_MIN_LEN,
            });
        }
        self.current_card_id = Some(id.to_string());
        Ok(())
    }

    /// Loads the entry at `position` for editing.
    pub fn start_edit<B: StorageBackend>(
        &mut self,
        store: &EntryStore<B>,
        position: usize,
    ) -> Result<Entry> {
        let entry = store.get(position).ok_or(TaabError::IndexOutOfRange {
            index: position,
            len: store.len(),
        })?;
        self.current_card_id = Some(entry.card_id.clone());
        self.form = EntryForm::from_entry(entry);
        self.mode = EditorMode::Editing(position);
        Ok(entry.clone())
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Reads an image file into the form as a data URL.
    pub fn attach_image(&mut self, path: &Path) -> Result<()> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_else(|| "(no extension)".to_string());
            return Err(TaabError::UnsupportedFileType(ext));
        }
        let bytes = std::fs::read(path)?;
        self.attach_image_bytes(&bytes, mime.essence_str());
        Ok(())
    }

    pub fn attach_image_bytes(&mut self, bytes: &[u8], mime: &str) {
        debug!(bytes = bytes.len(), mime, "image attached");
        self.form.image = image_data_url(bytes, mime);
    }

    pub fn clear_image(&mut self) {
        self.form.image.clear();
    }

    /// Checks the card id and the category's required fields against the
    /// default schema. See [`Editor::validate_for`].
    pub fn validate(&self) -> Result<()> {
        self.validate_for(SchemaVariant::default())
    }

    pub fn validate_for(&self, variant: SchemaVariant) -> Result<()> {
        match &self.current_card_id {
            Some(id) if !id.trim().is_empty() => {}
            _ => return Err(TaabError::NoCardScanned),
        }

        let category = self.form.category;
        if !variant.categories().contains(&category) {
            return Err(TaabError::CategoryNotOffered {
                category,
                schema: variant,
            });
        }

        for field in variant.required_fields(category) {
            if self.form.value(field).trim().is_empty() {
                return Err(TaabError::MissingRequiredField(field.label().to_string()));
            }
        }
        Ok(())
    }

    /// Creates (Idle) or overwrites (Editing) an entry, then returns to Idle
    /// with an empty form. On error nothing changes, here or in the store.
    pub fn save<B: StorageBackend>(
        &mut self,
        store: &mut EntryStore<B>,
        variant: SchemaVariant,
    ) -> Result<SaveOutcome> {
        self.validate_for(variant)?;
        let entry = self.build_entry();

        let outcome = match self.mode {
            EditorMode::Idle => {
                store.append(entry.clone())?;
                SaveOutcome::Created {
                    position: store.len() - 1,
                    entry,
                }
            }
            EditorMode::Editing(position) => {
                store.replace(position, entry.clone())?;
                SaveOutcome::Updated { position, entry }
            }
        };

        self.reset();
        Ok(outcome)
    }

    /// Removes the entry at `position` once the presenter confirms.
    ///
    /// Returns `Ok(None)` if the user declined. An edit in progress keeps
    /// pointing at the same entry; if that entry is the one removed, the edit
    /// is cancelled.
    pub fn delete<B: StorageBackend, P: Presenter + ?Sized>(
        &mut self,
        store: &mut EntryStore<B>,
        position: usize,
        presenter: &mut P,
    ) -> Result<Option<Entry>> {
        let entry = store.get(position).ok_or(TaabError::IndexOutOfRange {
            index: position,
            len: store.len(),
        })?;

        let prompt = format!(
            "Are you sure you want to delete entry {} ({})?",
            position + 1,
            display_card_id(&entry.card_id)
        );
        if !presenter.confirm(&prompt) {
            return Ok(None);
        }

        let removed = store.remove_at(position)?;
        if let EditorMode::Editing(editing) = self.mode {
            if editing == position {
                self.reset();
            } else if editing > position {
                self.mode = EditorMode::Editing(editing - 1);
            }
        }
        Ok(Some(removed))
    }

    fn build_entry(&self) -> Entry {
        let form = &self.form;
        Entry {
            card_id: self.current_card_id.clone().unwrap_or_default(),
            category: form.category,
            company: form.company.clone(),
            institution: form.institution.clone(),
            student_id: form.student_id.clone(),
            name: form.name.clone(),
            phone: form.phone.clone(),
            address: form.address.clone(),
            timestamp: Utc::now(),
            image: form.image.clone(),
        }
    }

    fn reset(&mut self) {
        self.current_card_id = None;
        self.mode = EditorMode::Idle;
        self.form = EntryForm::default();
    }
}

fn display_card_id(id: &str) -> &str {
    if id.is_empty() {
        "no card id"
    } else {
        id
    }
}

//! # Format Codec
//!
//! Converts entries to and from the two interchange formats.
//!
//! ## CSV
//!
//! Columns follow [`SchemaVariant::columns`]; the header row carries the
//! column labels and is ignored on the way in. Output uses standard quoting
//! (via the `csv` crate), so values containing commas, quotes or line breaks
//! survive a round trip. Files written by older versions, which joined values
//! with bare commas, still parse the same way as long as no value contained a
//! comma or a quote. [`decode_legacy_csv`] reproduces the old naive split for
//! the rare file that needs it.
//!
//! Rows are decoded independently: a row that cannot be decoded is skipped and
//! reported as a [`TaabError::MalformedCsvRow`] warning; the other rows are
//! kept.
//!
//! ## JSON
//!
//! A document is an array of objects keyed as in [`Field::key`]. Missing keys
//! take the defaults described in [`crate::model`]. Decoding is
//! all-or-nothing: any problem anywhere in the document fails the whole
//! import with [`TaabError::MalformedJson`].
//!
//! ## Images
//!
//! Attached images are data URLs. They are large, so both exporters leave
//! them out unless asked to include them.

use crate::error::{Result, TaabError};
use crate::model::{Entry, Field, SchemaVariant};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const EXPORT_PREFIX: &str = "taab_scan_log_";

/// Interchange file format, for both import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
        }
    }

    /// Picks the import format from a file's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            "" => Err(TaabError::UnsupportedFileType("(no extension)".to_string())),
            _ => Err(TaabError::UnsupportedFileType(ext)),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            other => Err(format!("Unsupported format: {}", other)),
        }
    }
}

/// `taab_scan_log_<ISO time with ':' and '.' replaced by '-'>.<ext>`
pub fn export_filename(now: DateTime<Utc>, format: FileFormat) -> String {
    let stamp = now
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    format!("{}{}.{}", EXPORT_PREFIX, stamp, format.extension())
}

pub fn csv_header(variant: SchemaVariant) -> Vec<&'static str> {
    variant.columns().iter().map(|f| f.label()).collect()
}

pub fn to_csv_row(variant: SchemaVariant, entry: &Entry, include_images: bool) -> Vec<String> {
    variant
        .columns()
        .iter()
        .map(|field| match field {
            Field::Image if !include_images => String::new(),
            _ => entry.text(*field),
        })
        .collect()
}

/// Builds an entry from positional CSV fields. `line` is only used for error
/// reporting.
pub fn from_csv_record<S: AsRef<str>>(
    variant: SchemaVariant,
    fields: &[S],
    line: u64,
) -> Result<Entry> {
    let columns = variant.columns();
    if fields.len() > columns.len() {
        return Err(TaabError::MalformedCsvRow {
            line,
            reason: format!(
                "expected at most {} columns, found {}",
                columns.len(),
                fields.len()
            ),
        });
    }

    let mut entry = Entry::new(String::new());
    for (field, value) in columns.iter().zip(fields) {
        entry
            .set_text(*field, value.as_ref())
            .map_err(|reason| TaabError::MalformedCsvRow { line, reason })?;
    }
    Ok(entry)
}

/// The original line format: values split on bare commas, no quoting.
pub fn from_legacy_csv_line(variant: SchemaVariant, line: &str, line_number: u64) -> Result<Entry> {
    let fields: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
    from_csv_record(variant, &fields, line_number)
}

pub fn encode_csv(variant: SchemaVariant, entries: &[Entry], include_images: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(csv_header(variant))?;
    for entry in entries {
        writer.write_record(to_csv_row(variant, entry, include_images))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TaabError::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| TaabError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Outcome of decoding a CSV document: the good rows, and one warning per
/// skipped row.
#[derive(Debug, Default)]
pub struct CsvImport {
    pub entries: Vec<Entry>,
    pub warnings: Vec<TaabError>,
}

pub fn decode_csv(variant: SchemaVariant, text: &str) -> CsvImport {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut result = CsvImport::default();
    for record in reader.records() {
        match record {
            Ok(record) => {
                if record.iter().all(|v| v.trim().is_empty()) {
                    continue;
                }
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                let fields: Vec<&str> = record.iter().collect();
                match from_csv_record(variant, &fields, line) {
                    Ok(entry) => result.entries.push(entry),
                    Err(e) => result.warnings.push(e),
                }
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                result.warnings.push(TaabError::MalformedCsvRow {
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }
    result
}

/// Decodes with the original naive comma split. The first line is the header.
pub fn decode_legacy_csv(variant: SchemaVariant, text: &str) -> CsvImport {
    let mut result = CsvImport::default();
    for (i, line) in text.trim().lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match from_legacy_csv_line(variant, line, i as u64 + 1) {
            Ok(entry) => result.entries.push(entry),
            Err(e) => result.warnings.push(e),
        }
    }
    result
}

pub fn to_json(entry: &Entry, include_images: bool) -> Result<Value> {
    let mut value = serde_json::to_value(entry)?;
    if !include_images {
        if let Value::Object(map) = &mut value {
            map.remove(Field::Image.key());
        }
    }
    Ok(value)
}

pub fn from_json(value: Value) -> Result<Entry> {
    if !value.is_object() {
        return Err(TaabError::MalformedJson(format!(
            "expected an object, found {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value).map_err(|e| TaabError::MalformedJson(e.to_string()))
}

pub fn encode_json(entries: &[Entry], include_images: bool) -> Result<String> {
    let values = entries
        .iter()
        .map(|e| to_json(e, include_images))
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_string_pretty(&values)?)
}

pub fn decode_json(text: &str) -> Result<Vec<Entry>> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| TaabError::MalformedJson(e.to_string()))?;

    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(TaabError::MalformedJson(format!(
                "expected an array of entries, found {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            from_json(item).map_err(|e| match e {
                TaabError::MalformedJson(detail) => {
                    TaabError::MalformedJson(format!("entry {}: {}", i + 1, detail))
                }
                other => other,
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn image_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

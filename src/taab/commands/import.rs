use crate::codec::{self, FileFormat};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::SchemaVariant;
use crate::store::backend::StorageBackend;
use crate::store::EntryStore;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// How CSV input is split into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvDialect {
    /// Standard quoting.
    #[default]
    Quoted,
    /// Bare comma split, for files that relied on the old behavior.
    Legacy,
}

pub fn run_file<B: StorageBackend>(
    store: &mut EntryStore<B>,
    path: &Path,
    variant: SchemaVariant,
    dialect: CsvDialect,
) -> Result<CmdResult> {
    // Reject unsupported types before touching the file
    let format = FileFormat::from_path(path)?;
    let text = fs::read_to_string(path)?;
    info!(path = %path.display(), %format, "importing");
    run_text(store, &text, format, variant, dialect)
}

/// Appends every entry decoded from `text` with a single mirror write.
///
/// JSON is all-or-nothing. CSV keeps every good row and reports one warning
/// per row it skipped.
pub fn run_text<B: StorageBackend>(
    store: &mut EntryStore<B>,
    text: &str,
    format: FileFormat,
    variant: SchemaVariant,
    dialect: CsvDialect,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let entries = match format {
        FileFormat::Json => codec::decode_json(text)?,
        FileFormat::Csv => {
            let decoded = match dialect {
                CsvDialect::Quoted => codec::decode_csv(variant, text),
                CsvDialect::Legacy => codec::decode_legacy_csv(variant, text),
            };
            for problem in decoded.warnings {
                warn!(error = %problem, "skipped CSV row");
                result.add_message(CmdMessage::warning(problem.to_string()));
            }
            decoded.entries
        }
    };

    if entries.is_empty() {
        result.add_message(CmdMessage::info("No entries found in file."));
        return Ok(result);
    }

    let added = store.extend(entries.clone())?;
    result.add_message(CmdMessage::success(format!(
        "Loaded {} entries from file.",
        added
    )));
    result.add_message(CmdMessage::saved(store.len()));
    Ok(result.with_affected_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::TaabError;
    use crate::model::{Category, Entry};
    use crate::store::mem_backend::MemBackend;
    use crate::store::DEFAULT_SLOT_KEY;

    fn store() -> EntryStore<MemBackend> {
        EntryStore::open(MemBackend::new(), DEFAULT_SLOT_KEY).0
    }

    #[test]
    fn json_import_defaults_missing_fields() {
        let mut store = store();
        let before = chrono::Utc::now();
        let result = run_text(
            &mut store,
            r#"[{"cardId":"B2","category":"Student"}]"#,
            FileFormat::Json,
            SchemaVariant::Institution,
            CsvDialect::Quoted,
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        let entry = store.get(0).unwrap();
        assert_eq!(entry.card_id, "B2");
        assert_eq!(entry.category, Category::Student);
        assert_eq!(entry.name, "");
        assert_eq!(entry.institution, "");
        assert!(entry.timestamp >= before);
        assert_eq!(result.messages[0].content, "Loaded 1 entries from file.");
    }

    #[test]
    fn bad_json_imports_nothing() {
        let mut store = store();
        store.append(Entry::new("KEEP")).unwrap();
        let err = run_text(
            &mut store,
            r#"[{"cardId":"B2"}, 7]"#,
            FileFormat::Json,
            SchemaVariant::Institution,
            CsvDialect::Quoted,
        )
        .unwrap_err();
        assert!(matches!(err, TaabError::MalformedJson(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn csv_import_keeps_good_rows_and_warns_on_bad() {
        let mut store = store();
        let text = "Card ID,Category,Company,Name,Phone,Address\n\
                    A1,General,,Alice,555,X\n\
                    A2,Platinum,,Bob,556,Y\n\
                    A3,General Branded,Acme,Carol,557,Z\n";
        let result = run_text(
            &mut store,
            text,
            FileFormat::Csv,
            SchemaVariant::Generic,
            CsvDialect::Quoted,
        )
        .unwrap();

        assert_eq!(store.len(), 2);
        let warnings: Vec<_> = result
            .messages
            .iter()
            .filter(|m| m.level == MessageLevel::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].content.contains("line 3"));
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "Loaded 2 entries from file."));
    }

    #[test]
    fn legacy_dialect_splits_on_every_comma() {
        let mut store = store();
        let text = "Card ID,Category,Company,Name,Phone,Address\nA1,General,,\"Smith, J\",555,X";
        run_text(
            &mut store,
            text,
            FileFormat::Csv,
            SchemaVariant::Generic,
            CsvDialect::Legacy,
        )
        .unwrap();
        // Seven pieces for six columns: the row is rejected rather than misaligned
        assert!(store.is_empty());
    }

    #[test]
    fn empty_file_writes_nothing() {
        let mut store = store();
        let result = run_text(
            &mut store,
            "Card ID,Category,Company,Name,Phone,Address\n",
            FileFormat::Csv,
            SchemaVariant::Generic,
            CsvDialect::Quoted,
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "No entries found in file.");
        assert_eq!(store.backend().raw_slot(DEFAULT_SLOT_KEY), None);
    }

    #[test]
    fn unsupported_extension_is_rejected_before_reading() {
        let mut store = store();
        let err = run_file(
            &mut store,
            Path::new("/does/not/exist/entries.xlsx"),
            SchemaVariant::Generic,
            CsvDialect::Quoted,
        )
        .unwrap_err();
        assert!(matches!(err, TaabError::UnsupportedFileType(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn run_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        fs::write(&path, r#"[{"cardId":"F1"},{"cardId":"F2"}]"#).unwrap();

        let mut store = store();
        run_file(&mut store, &path, SchemaVariant::Generic, CsvDialect::Quoted).unwrap();
        assert_eq!(store.len(), 2);
    }
}

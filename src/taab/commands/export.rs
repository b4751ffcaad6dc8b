use crate::codec::{self, FileFormat};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Entry, SchemaVariant};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub format: FileFormat,
    pub variant: SchemaVariant,
    pub include_images: bool,
}

pub fn render(entries: &[Entry], options: ExportOptions) -> Result<String> {
    match options.format {
        FileFormat::Csv => codec::encode_csv(options.variant, entries, options.include_images),
        FileFormat::Json => codec::encode_json(entries, options.include_images),
    }
}

/// Encodes the entries without writing anything; the text is returned in
/// `exported_text`.
pub fn to_string(entries: &[Entry], options: ExportOptions) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.exported_text = Some(render(entries, options)?);
    Ok(result)
}

/// Writes `taab_scan_log_<time>.<ext>` into `out_dir`.
pub fn run(
    entries: &[Entry],
    options: ExportOptions,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let content = render(entries, options)?;

    if !out_dir.exists() {
        fs::create_dir_all(out_dir)?;
    }
    let path = out_dir.join(codec::export_filename(now, options.format));
    fs::write(&path, content)?;
    info!(path = %path.display(), count = entries.len(), "exported");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} entries to {}",
        entries.len(),
        path.display()
    )));
    result.exported_path = Some(path);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alice() -> Entry {
        let mut e = Entry::new("A1");
        e.name = "Alice".into();
        e.phone = "555".into();
        e.address = "X".into();
        e.image = "data:image/png;base64,aGk=".into();
        e
    }

    fn options(format: FileFormat) -> ExportOptions {
        ExportOptions {
            format,
            variant: SchemaVariant::Generic,
            include_images: false,
        }
    }

    #[test]
    fn csv_export_matches_generic_layout() {
        let result = to_string(&[alice()], options(FileFormat::Csv)).unwrap();
        assert_eq!(
            result.exported_text.unwrap(),
            "Card ID,Category,Company,Name,Phone,Address\nA1,General,,Alice,555,X"
        );
    }

    #[test]
    fn json_export_leaves_images_out_by_default() {
        let text = render(&[alice()], options(FileFormat::Json)).unwrap();
        assert!(!text.contains("image"));

        let mut with_images = options(FileFormat::Json);
        with_images.include_images = true;
        let text = render(&[alice()], with_images).unwrap();
        assert!(text.contains("data:image/png;base64,aGk="));
    }

    #[test]
    fn writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap();

        let result = run(&[alice()], options(FileFormat::Csv), &out, now).unwrap();
        let path = result.exported_path.unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "taab_scan_log_2024-05-01T10-20-30-000Z.csv"
        );
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Card ID,Category"));
    }

    #[test]
    fn empty_list_exports_header_only() {
        let text = render(&[], options(FileFormat::Csv)).unwrap();
        assert_eq!(text, "Card ID,Category,Company,Name,Phone,Address");
        assert_eq!(render(&[], options(FileFormat::Json)).unwrap(), "[]");
    }
}

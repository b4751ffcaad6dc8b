use crate::commands::{CmdMessage, CmdResult};
use crate::editor::Editor;
use crate::error::Result;
use crate::scanner::CardScanner;
use std::path::Path;

pub fn scan<S: CardScanner>(editor: &mut Editor, scanner: &mut S) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match editor.begin_scan(scanner)? {
        Some(id) => result.add_message(CmdMessage::info(format!("Card scanned: {}", id))),
        None => result.add_message(CmdMessage::warning("No card detected.")),
    }
    Ok(result)
}

pub fn enter_card_id(editor: &mut Editor, text: &str) -> Result<CmdResult> {
    editor.enter_card_id(text)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Card ID set: {}",
        editor.current_card_id().unwrap_or_default()
    )));
    Ok(result)
}

pub fn attach_image(editor: &mut Editor, path: &Path) -> Result<CmdResult> {
    editor.attach_image(path)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("Image attached: {}", path.display())));
    Ok(result)
}

pub fn detach_image(editor: &mut Editor) -> CmdResult {
    editor.clear_image();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info("Image removed."));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::TaabError;
    use crate::test_utils::QueuedScanner;

    #[test]
    fn scan_reports_detected_card() {
        let mut editor = Editor::new();
        let result = scan(&mut editor, &mut QueuedScanner::new(&["04A1"])).unwrap();
        assert_eq!(result.messages[0].content, "Card scanned: 04A1");
        assert_eq!(editor.current_card_id(), Some("04A1"));
    }

    #[test]
    fn scan_with_no_card_warns() {
        let mut editor = Editor::new();
        let result = scan(&mut editor, &mut QueuedScanner::new(&[])).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn scan_without_reader_fails() {
        let mut editor = Editor::new();
        assert!(matches!(
            scan(&mut editor, &mut QueuedScanner::unavailable()),
            Err(TaabError::ScannerUnavailable)
        ));
    }

    #[test]
    fn detach_clears_form_image() {
        let mut editor = Editor::new();
        editor.attach_image_bytes(b"png", "image/png");
        detach_image(&mut editor);
        assert!(editor.form().image.is_empty());
    }

    #[test]
    fn manual_entry_is_trimmed() {
        let mut editor = Editor::new();
        let result = enter_card_id(&mut editor, "  ABCD1234 ").unwrap();
        assert_eq!(result.messages[0].content, "Card ID set: ABCD1234");
    }
}

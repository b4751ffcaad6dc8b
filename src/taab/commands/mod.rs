use crate::config::TaabConfig;
use crate::index::IndexedEntry;
use crate::model::Entry;
use std::path::PathBuf;
use std::time::Duration;

pub mod capture;
pub mod clear;
pub mod config;
pub mod delete;
pub mod edit;
pub mod export;
pub mod fields;
pub mod helpers;
pub mod import;
pub mod list;
pub mod save;

/// How long the "saved" acknowledgement stays visible after a mutation.
pub const AUTOSAVE_NOTICE_TTL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    /// Transient acknowledgement that the slot was rewritten. Clients that can
    /// show it briefly should hide it after `ttl`.
    Saved { ttl: Duration },
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    /// "Saved N entries." with the standard notice lifetime.
    pub fn saved(count: usize) -> Self {
        Self {
            level: MessageLevel::Saved {
                ttl: AUTOSAVE_NOTICE_TTL,
            },
            content: format!("Saved {} entries.", count),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_entries: Vec<Entry>,
    pub listed_entries: Vec<IndexedEntry>,
    pub exported_path: Option<PathBuf>,
    pub exported_text: Option<String>,
    pub config: Option<TaabConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_entries(mut self, entries: Vec<Entry>) -> Self {
        self.affected_entries = entries;
        self
    }

    pub fn with_listed_entries(mut self, entries: Vec<IndexedEntry>) -> Self {
        self.listed_entries = entries;
        self
    }

    pub fn with_config(mut self, config: TaabConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// True if any message is a warning or an error.
    pub fn has_problems(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_notice_uses_standard_ttl() {
        let msg = CmdMessage::saved(3);
        assert_eq!(msg.content, "Saved 3 entries.");
        assert_eq!(
            msg.level,
            MessageLevel::Saved {
                ttl: Duration::from_millis(1500)
            }
        );
    }

    #[test]
    fn has_problems_ignores_info_and_saved() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("hello"));
        result.add_message(CmdMessage::saved(1));
        assert!(!result.has_problems());
        result.add_message(CmdMessage::warning("careful"));
        assert!(result.has_problems());
    }
}

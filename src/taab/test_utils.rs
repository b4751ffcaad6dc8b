//! Test doubles for the presenter and scanner seams.

use crate::commands::CmdMessage;
use crate::index::IndexedEntry;
use crate::presenter::Presenter;
use crate::scanner::CardScanner;
use std::collections::VecDeque;

/// Records everything it is asked to show and answers confirmations from a
/// queue. An empty queue answers `false`.
#[derive(Debug, Default)]
pub struct ScriptedPresenter {
    pub answers: VecDeque<bool>,
    pub prompts: Vec<String>,
    pub rendered: Vec<Vec<IndexedEntry>>,
    pub notices: Vec<CmdMessage>,
}

impl ScriptedPresenter {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Presenter for ScriptedPresenter {
    fn render_rows(&mut self, rows: &[IndexedEntry]) {
        self.rendered.push(rows.to_vec());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn notify(&mut self, message: &CmdMessage) {
        self.notices.push(message.clone());
    }
}

/// A reader that delivers a fixed list of identifiers.
pub struct QueuedScanner {
    available: bool,
    queue: VecDeque<String>,
}

impl QueuedScanner {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            available: true,
            queue: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            queue: VecDeque::new(),
        }
    }
}

impl CardScanner for QueuedScanner {
    fn is_available(&self) -> bool {
        self.available
    }

    fn poll(&mut self) -> Option<String> {
        self.queue.pop_front()
    }
}

//! The seam between the core and whatever shows entries to a person.
//!
//! The core never prints. Anything that needs a human (showing the table,
//! asking "are you sure?", flashing a status line) goes through a
//! [`Presenter`]. The binary's implementation lives in the CLI layer; tests use
//! `test_utils::ScriptedPresenter`.

use crate::commands::CmdMessage;
use crate::index::IndexedEntry;

pub trait Presenter {
    /// Show the given rows, replacing whatever was shown before.
    fn render_rows(&mut self, rows: &[IndexedEntry]);

    /// Synchronous yes/no gate. `false` means the action must not happen.
    fn confirm(&mut self, prompt: &str) -> bool;

    fn notify(&mut self, message: &CmdMessage);
}

/// Answers every confirmation with the same value and discards output.
///
/// Used where the caller already decided, e.g. `--yes` on the command line.
pub struct AutoConfirm(pub bool);

impl Presenter for AutoConfirm {
    fn render_rows(&mut self, _rows: &[IndexedEntry]) {}

    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }

    fn notify(&mut self, _message: &CmdMessage) {}
}

use super::render::{print_messages, render_entry_table};
use super::styles::TABLE_STYLES;
use console::Term;
use std::io::{self, BufRead};
use taab::api::CmdMessage;
use taab::index::IndexedEntry;
use taab::model::SchemaVariant;
use taab::presenter::Presenter;

/// Prints to stdout and asks confirmations on stderr, reading the answer
/// from stdin (piped input works too).
pub(super) struct TerminalPresenter {
    variant: SchemaVariant,
    term: Term,
}

impl TerminalPresenter {
    pub(super) fn new(variant: SchemaVariant) -> Self {
        Self {
            variant,
            term: Term::stderr(),
        }
    }
}

impl Presenter for TerminalPresenter {
    fn render_rows(&mut self, rows: &[IndexedEntry]) {
        print!("{}", render_entry_table(rows, self.variant));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        let question = format!("{} [y/N] ", TABLE_STYLES.prompt.apply_to(prompt));
        if self.term.write_str(&question).is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }

    fn notify(&mut self, message: &CmdMessage) {
        print_messages(std::slice::from_ref(message));
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

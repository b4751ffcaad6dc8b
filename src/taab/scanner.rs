//! Card reader seam.
//!
//! A reader announces itself through [`CardScanner::is_available`] and then
//! delivers identifiers one at a time through [`CardScanner::poll`]. Callers
//! must check availability first; an unavailable reader is reported as
//! [`crate::error::TaabError::ScannerUnavailable`], never silently ignored.

use std::io::BufRead;
use tracing::debug;

pub trait CardScanner {
    fn is_available(&self) -> bool;

    /// The next identifier the reader has detected, if any.
    fn poll(&mut self) -> Option<String>;
}

/// A keyboard-wedge reader: every non-empty line of input is one card.
pub struct LineScanner<R: BufRead> {
    reader: R,
    remaining: Option<usize>,
}

impl<R: BufRead> LineScanner<R> {
    /// Reads until the input ends.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            remaining: None,
        }
    }

    /// Stops after the first card, for interactive use.
    pub fn once(reader: R) -> Self {
        Self {
            reader,
            remaining: Some(1),
        }
    }
}

impl<R: BufRead> CardScanner for LineScanner<R> {
    fn is_available(&self) -> bool {
        true
    }

    fn poll(&mut self) -> Option<String> {
        if self.remaining == Some(0) {
            return None;
        }
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    let id = line.trim();
                    if id.is_empty() {
                        continue;
                    }
                    if let Some(n) = self.remaining.as_mut() {
                        *n -= 1;
                    }
                    debug!(card_id = id, "card detected");
                    return Some(id.to_string());
                }
                Err(e) => {
                    debug!(error = %e, "card reader input failed");
                    return None;
                }
            }
        }
    }
}

/// Stands in when the host has no reader at all.
pub struct NoScanner;

impl CardScanner for NoScanner {
    fn is_available(&self) -> bool {
        false
    }

    fn poll(&mut self) -> Option<String> {
        None
    }
}

//! Tag scanning: the reader seam, presence debounce and the polling thread.

mod debounce;
mod line;
mod worker;

use std::io;
use std::time::Duration;

pub use line::LineScanner;
pub use worker::{ScanLoop, Step, spawn_scanner};

/// What the scanner thread tells the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A tag was newly presented.
    Tag(String),
    /// The scan gate switch was turned off.
    Gated,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("tag input closed")]
    Closed,
    #[error("failed to read tag: {0}")]
    Io(#[from] io::Error),
}

/// A tag reader. `poll` waits at most `timeout` and returns the identifier
/// of the tag in range, if any.
pub trait TagScanner {
    fn poll(&mut self, timeout: Duration) -> Result<Option<String>, ScanError>;
}

/// Clean up raw tag text: NTAG pages are NUL-padded, and line input may
/// carry whitespace. Returns `None` when nothing is left.
pub fn normalize_tag_text(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|&c| c != '\0').collect();
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

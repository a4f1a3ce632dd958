use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The folder does not exist, is not a directory or cannot be listed.
    #[error("Invalid folder {}: {reason}", path.display())]
    InvalidFolder { path: PathBuf, reason: String },
}

/// Failure to extract text from a single document.
///
/// Never escapes a scan: the scanner logs it and skips the document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct ExtractionError {
    pub reason: String,
}

impl ExtractionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for ExtractionError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

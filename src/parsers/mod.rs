use std::path::Path;

use crate::error::ExtractionError;

pub mod pdf;
#[cfg(test)]
pub(crate) mod text;

pub use pdf::PdfExtractor;

/// Turns a document on disk into plain text.
pub trait TextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

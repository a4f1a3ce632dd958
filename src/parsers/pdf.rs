use std::any::Any;
use std::cell::Cell;
use std::panic::{self, UnwindSafe};
use std::path::Path;
use std::sync::Once;
use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::error::ExtractionError;

use super::TextExtractor;

/// Extracts the text of every page with `pdf_extract`.
///
/// `pdf_extract` panics on some malformed files instead of returning an
/// error; those panics are reported as an [`ExtractionError`] like any other
/// failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let start = Instant::now();
        let text = catch_quietly(|| pdf_extract::extract_text(path))
            .map_err(|payload| ExtractionError::new(panic_reason(payload.as_ref())))?
            .map_err(|e| ExtractionError::new(e.to_string()))?;

        debug!(
            path = %path.display(),
            chars = text.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "extracted text"
        );
        Ok(text)
    }
}

thread_local! {
    static SILENCED: Cell<bool> = Cell::new(false);
}

static QUIET_HOOK: Once = Once::new();

/// `catch_unwind` that keeps the panic message off stderr, which the TUI owns.
/// Panics outside this call still reach the previous hook.
fn catch_quietly<R>(f: impl FnOnce() -> R + UnwindSafe) -> thread::Result<R> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCED.with(Cell::get) {
                previous(info);
            }
        }));
    });

    SILENCED.with(|s| s.set(true));
    let result = panic::catch_unwind(f);
    SILENCED.with(|s| s.set(false));
    result
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("PDF parser panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("PDF parser panicked: {}", msg)
    } else {
        "PDF parser panicked".to_string()
    }
}

pub mod cmd;
pub mod engine;
pub mod error;
pub mod parsers;
pub mod types;
pub mod utils;

pub use engine::{rank, ScanOptions, ScanProgress, ScanReport, Scanner};
pub use error::{ExtractionError, ScanError};
pub use parsers::{PdfExtractor, TextExtractor};
pub use types::{ExtractionFailure, KeywordSet, MatchResult};
pub use utils::{is_pdf_name, parse_keywords, read_keywords_from_file};

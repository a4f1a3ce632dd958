//! Folder scan and keyword ranking.
//!
//! A scan lists every `*.pdf` entry of a folder, extracts each document's
//! text, records which keywords it contains and orders the documents by how
//! many distinct keywords matched. Documents whose text cannot be extracted
//! are logged and skipped; only an unusable folder fails the scan.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::parsers::{PdfExtractor, TextExtractor};
use crate::types::{ExtractionFailure, KeywordSet, MatchResult};
use crate::utils::is_pdf_name;

/// Rank the PDF documents of `folder` by how many of `keywords` they contain.
///
/// Keywords are normalized first (trimmed, case-folded, deduplicated).
pub fn rank<S: AsRef<str>>(folder: &Path, keywords: &[S]) -> Result<Vec<MatchResult>, ScanError> {
    let keywords: KeywordSet = keywords.iter().collect();
    Scanner::new(PdfExtractor)
        .scan(folder, &keywords)
        .map(|report| report.results)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScanOptions {
    /// Descend into subfolders
    pub recursive: bool,
}

/// Emitted before each document is read
#[derive(Clone, Copy, Debug)]
pub struct ScanProgress<'a> {
    pub index: usize,
    pub total: usize,
    pub name: &'a str,
}

/// Outcome of one scan
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Documents with at least one match, by match count descending
    pub results: Vec<MatchResult>,
    /// Number of candidate documents found
    pub scanned: usize,
    pub failures: Vec<ExtractionFailure>,
}

struct Candidate {
    name: String,
    path: PathBuf,
}

pub struct Scanner<E> {
    extractor: E,
    options: ScanOptions,
}

impl<E: TextExtractor> Scanner<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            options: ScanOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_options(&mut self, options: ScanOptions) {
        self.options = options;
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    pub fn scan(&self, folder: &Path, keywords: &KeywordSet) -> Result<ScanReport, ScanError> {
        self.scan_with_progress(folder, keywords, |_| {})
    }

    pub fn scan_with_progress<F>(
        &self,
        folder: &Path,
        keywords: &KeywordSet,
        mut on_progress: F,
    ) -> Result<ScanReport, ScanError>
    where
        F: FnMut(ScanProgress<'_>),
    {
        let candidates = self.candidates(folder)?;
        let mut report = ScanReport {
            scanned: candidates.len(),
            ..ScanReport::default()
        };

        if keywords.is_empty() {
            debug!("no keywords given, skipping extraction");
            return Ok(report);
        }

        let start = Instant::now();
        let total = candidates.len();
        for (index, candidate) in candidates.into_iter().enumerate() {
            on_progress(ScanProgress {
                index,
                total,
                name: &candidate.name,
            });

            let text = match self.extractor.extract_text(&candidate.path) {
                Ok(text) => text.to_lowercase(),
                Err(error) => {
                    warn!(document = %candidate.name, error = %error, "failed to extract text, skipping");
                    report.failures.push(ExtractionFailure {
                        name: candidate.name,
                        path: candidate.path,
                        error,
                    });
                    continue;
                }
            };

            let matched = keywords.matches_in(&text);
            debug!(document = %candidate.name, matched = matched.len(), "scanned");
            if !matched.is_empty() {
                report.results.push(MatchResult {
                    name: candidate.name,
                    path: candidate.path,
                    matched,
                });
            }
        }

        // Stable: equal counts keep enumeration order.
        report.results.sort_by(|a, b| b.count().cmp(&a.count()));

        info!(
            scanned = report.scanned,
            matched = report.results.len(),
            failed = report.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );
        Ok(report)
    }

    /// Documents a scan of `folder` would read, in scan order
    pub fn list(&self, folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
        Ok(self
            .candidates(folder)?
            .into_iter()
            .map(|c| c.path)
            .collect())
    }

    fn candidates(&self, folder: &Path) -> Result<Vec<Candidate>, ScanError> {
        validate_folder(folder)?;
        Ok(pdf_candidates(folder, self.options.recursive))
    }
}

fn invalid_folder(folder: &Path, reason: impl Into<String>) -> ScanError {
    ScanError::InvalidFolder {
        path: folder.to_path_buf(),
        reason: reason.into(),
    }
}

fn validate_folder(folder: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(folder).map_err(|e| invalid_folder(folder, e.to_string()))?;
    if !metadata.is_dir() {
        return Err(invalid_folder(folder, "not a directory"));
    }
    fs::read_dir(folder).map_err(|e| invalid_folder(folder, e.to_string()))?;
    Ok(())
}

/// Entries of `folder` whose name ends in `.pdf`, sorted by file name.
///
/// Flat scans take every direct child, recursive scans take regular files
/// (following symlinks) at any depth. Names are relative to `folder`.
fn pdf_candidates(folder: &Path, recursive: bool) -> Vec<Candidate> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    WalkDir::new(folder)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "cannot read folder entry, skipping");
                None
            }
        })
        .filter(|entry| is_pdf_name(entry.file_name()))
        .filter(|entry| !recursive || entry.path().is_file())
        .map(|entry| {
            let path = entry.into_path();
            let name = path
                .strip_prefix(folder)
                .unwrap_or(path.as_path())
                .to_string_lossy()
                .into_owned();
            Candidate { name, path }
        })
        .collect()
}

use std::path::PathBuf;

use crate::error::ExtractionError;

/// Unique, case-folded search keywords in first-occurrence order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim, fold and add a keyword. Returns false when it was empty or already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        let keyword = raw.trim().to_lowercase();
        if keyword.is_empty() || self.keywords.contains(&keyword) {
            return false;
        }
        self.keywords.push(keyword);
        true
    }

    pub fn extend<I, S>(&mut self, raw: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in raw {
            self.insert(keyword.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Keywords contained in an already case-folded text, in set order.
    pub fn matches_in(&self, folded_text: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|k| folded_text.contains(k.as_str()))
            .cloned()
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        set.extend(iter);
        set
    }
}

/// Keywords found in one document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    /// Display name: the file name, or the path relative to the scanned folder
    pub name: String,
    pub path: PathBuf,
    pub matched: Vec<String>,
}

impl MatchResult {
    pub fn count(&self) -> usize {
        self.matched.len()
    }
}

/// A document skipped because its text could not be extracted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionFailure {
    pub name: String,
    pub path: PathBuf,
    pub error: ExtractionError,
}

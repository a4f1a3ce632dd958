use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nom::bytes::complete::take_till;
use nom::character::complete::char;
use nom::multi::separated_list0;
use nom::IResult;

use crate::types::KeywordSet;

/// Suffix a file name must end with to be scanned. Matched case-sensitively.
pub const PDF_SUFFIX: &str = ".pdf";

/// Split a delimited keyword line into its raw, untrimmed pieces
pub fn parse_keyword_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(char(','), take_till(|c| c == ','))(input)
}

/// Parse a comma-separated keyword string such as `"Python, SQL, Go"`.
///
/// Pieces are trimmed and case-folded, empty pieces are dropped and
/// duplicates collapse.
pub fn parse_keywords(input: &str) -> KeywordSet {
    match parse_keyword_list(input) {
        Ok((_, pieces)) => pieces.into_iter().collect(),
        Err(_) => KeywordSet::new(),
    }
}

/// Read keywords from a file: one comma-separated list per line, `#` starts a comment line
pub fn read_keywords_from_file(path: &Path) -> Result<KeywordSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read keywords file: {}", path.display()))?;

    Ok(read_keywords_from_string(&content))
}

fn read_keywords_from_string(content: &str) -> KeywordSet {
    let mut keywords = KeywordSet::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        keywords.extend(parse_keywords(line).iter());
    }

    keywords
}

/// Whether a file name qualifies as a candidate document (`report.pdf` yes, `report.PDF` no)
pub fn is_pdf_name(name: impl AsRef<OsStr>) -> bool {
    name.as_ref().as_encoded_bytes().ends_with(PDF_SUFFIX.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_name() {
        assert!(is_pdf_name("alice.pdf"));
        assert!(is_pdf_name(".pdf"));
        assert!(!is_pdf_name("alice.PDF"));
        assert!(!is_pdf_name("notes.txt"));
        assert!(!is_pdf_name("alice.pdf.bak"));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_pdf_name_accepts_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        assert!(is_pdf_name(OsStr::from_bytes(b"caf\xe9.pdf")));
        assert!(!is_pdf_name(OsStr::from_bytes(b"caf\xe9.PDF")));
    }

    #[test]
    fn test_parse_keyword_list() {
        assert_eq!(
            parse_keyword_list("a, b,,c"),
            Ok(("", vec!["a", " b", "", "c"]))
        );
        assert_eq!(parse_keyword_list(""), Ok(("", vec![""])));
    }

    #[test]
    fn test_parse_keywords_normalizes() {
        let keywords = parse_keywords(" Java ,  , java");
        assert_eq!(keywords.iter().collect::<Vec<_>>(), vec!["java"]);
    }

    #[test]
    fn test_parse_keywords_keeps_order() {
        let keywords = parse_keywords("Python, SQL, Go");
        assert_eq!(keywords.iter().collect::<Vec<_>>(), vec!["python", "sql", "go"]);
    }

    #[test]
    fn test_parse_keywords_blank_input() {
        assert!(parse_keywords("").is_empty());
        assert!(parse_keywords(" , ,, ").is_empty());
    }

    #[test]
    fn test_read_keywords_from_string() {
        let input = "# required skills\nPython, SQL\n\n  docker ,python\n# Go\n";
        let keywords = read_keywords_from_string(input);
        assert_eq!(
            keywords.iter().collect::<Vec<_>>(),
            vec!["python", "sql", "docker"]
        );
    }

    #[test]
    fn test_read_keywords_from_missing_file() {
        let err = read_keywords_from_file(Path::new("/nonexistent/skills.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read keywords file"));
    }
}

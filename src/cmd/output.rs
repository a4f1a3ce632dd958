use std::borrow::Cow;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::types::MatchResult;

pub const RESULTS_HEADER: &str = "Ranked documents (by keywords matched):";
pub const NO_RESULTS: &str = "No documents matched the given keywords.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

pub fn render(results: &[MatchResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(results)),
        OutputFormat::Json => render_json(results),
        OutputFormat::Csv => Ok(render_csv(results)),
    }
}

/// `<name> — <count> matched: <keywords>`
pub fn result_line(result: &MatchResult) -> String {
    format!(
        "{} — {} matched: {}",
        result.name,
        result.count(),
        result.matched.join(", ")
    )
}

pub fn render_text(results: &[MatchResult]) -> String {
    if results.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }

    let mut out = format!("{}\n\n", RESULTS_HEADER);
    for result in results {
        out.push_str(&result_line(result));
        out.push('\n');
    }
    out
}

/// One JSON output row
#[derive(Serialize)]
struct JsonRow<'a> {
    document: &'a str,
    path: Cow<'a, str>,
    count: usize,
    matched: &'a [String],
}

impl<'a> From<&'a MatchResult> for JsonRow<'a> {
    fn from(result: &'a MatchResult) -> Self {
        Self {
            document: &result.name,
            path: result.path.to_string_lossy(),
            count: result.count(),
            matched: &result.matched,
        }
    }
}

pub fn render_json(results: &[MatchResult]) -> Result<String> {
    let rows: Vec<JsonRow<'_>> = results.iter().map(JsonRow::from).collect();
    serde_json::to_string_pretty(&rows).context("Failed to serialize results")
}

pub fn render_csv(results: &[MatchResult]) -> String {
    let mut out = String::from("document,count,matched\n");
    for result in results {
        out.push_str(&format!(
            "{},{},{}\n",
            csv_field(&result.name),
            result.count(),
            csv_field(&result.matched.join(";"))
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard is not available")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to copy results to clipboard")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn result(name: &str, matched: &[&str]) -> MatchResult {
        MatchResult {
            name: name.to_string(),
            path: PathBuf::from("/resumes").join(name),
            matched: matched.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_text() {
        let results = vec![
            result("alice.pdf", &["python", "sql"]),
            result("bob.pdf", &["python"]),
        ];
        assert_eq!(
            render_text(&results),
            "Ranked documents (by keywords matched):\n\n\
             alice.pdf — 2 matched: python, sql\n\
             bob.pdf — 1 matched: python\n"
        );
    }

    #[test]
    fn test_render_text_empty() {
        assert_eq!(render_text(&[]), "No documents matched the given keywords.\n");
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&[result("alice.pdf", &["python", "sql"])]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["document"], "alice.pdf");
        assert_eq!(value[0]["count"], 2);
        assert_eq!(value[0]["matched"][1], "sql");
        assert_eq!(value[0]["path"], "/resumes/alice.pdf");
        assert_eq!(
            value[0].as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["count", "document", "matched", "path"]
        );
    }

    #[test]
    fn test_render_json_empty() {
        assert_eq!(render_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_render_csv_quotes_fields() {
        let csv = render_csv(&[
            result("smith, john.pdf", &["c++", "go"]),
            result("plain.pdf", &["rust"]),
        ]);
        assert_eq!(
            csv,
            "document,count,matched\n\"smith, john.pdf\",2,c++;go\nplain.pdf,1,rust\n"
        );
    }

    #[test]
    fn test_render_dispatch() {
        let results = [result("bob.pdf", &["python"])];
        assert_eq!(render(&results, OutputFormat::Text).unwrap(), render_text(&results));
        assert_eq!(render(&results, OutputFormat::Csv).unwrap(), render_csv(&results));
    }
}

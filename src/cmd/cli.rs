use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

use crate::{
    cmd::{
        output::{copy_to_clipboard, render, render_text, result_line, OutputFormat, NO_RESULTS, RESULTS_HEADER},
        tui::TuiApp,
    },
    engine::{ScanOptions, ScanReport, Scanner},
    parsers::{PdfExtractor, TextExtractor},
    types::KeywordSet,
    utils::{parse_keywords, read_keywords_from_file},
};

#[derive(Parser)]
#[command(name = "pdfrank")]
#[command(about = "Rank the PDF documents in a folder by how many keywords they contain")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Enable TUI mode
    #[arg(short, long)]
    tui: bool,

    /// Log per-document details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (results and errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a folder and rank its documents
    Scan(ScanArgs),

    /// Prompt for folder and keywords
    Interactive,

    /// Terminal form with folder and keyword fields
    Tui {
        /// Folder to prefill
        folder: Option<PathBuf>,
    },

    /// List the documents a scan would read
    List {
        /// Folder containing the documents
        folder: PathBuf,

        /// Include subfolders
        #[arg(short, long)]
        recursive: bool,
    },

    /// Extract one document and show text statistics
    Info {
        /// Path to a PDF document
        file: PathBuf,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Folder containing the documents
    folder: PathBuf,

    /// Comma-separated keywords, e.g. "Python, SQL, Go"
    #[arg(short, long, required_unless_present = "keywords_file")]
    keywords: Option<String>,

    /// File with comma-separated keywords, one list per line
    #[arg(long, value_name = "FILE")]
    keywords_file: Option<PathBuf>,

    /// Include subfolders
    #[arg(short, long)]
    recursive: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Copy the rendered results to the clipboard
    #[arg(long)]
    copy: bool,
}

pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn run() -> Result<()> {
        let app = Self::new();
        let tui = app.cli.tui || matches!(app.cli.command, Some(Commands::Tui { .. }));
        init_logging(app.cli.verbose, app.cli.quiet, tui);
        let quiet = app.cli.quiet;

        match app.cli.command {
            Some(Commands::Scan(args)) => Self::run_scan(&args, quiet),
            Some(Commands::Interactive) => Self::run_interactive(),
            Some(Commands::Tui { folder }) => Self::run_tui(folder),
            Some(Commands::List { folder, recursive }) => Self::run_list(&folder, recursive),
            Some(Commands::Info { file }) => Self::run_info(&file),
            None => {
                if app.cli.tui {
                    Self::run_tui(None)
                } else if app.cli.interactive {
                    Self::run_interactive()
                } else {
                    Self::show_help();
                    Ok(())
                }
            }
        }
    }

    fn run_scan(args: &ScanArgs, quiet: bool) -> Result<()> {
        let keywords = Self::collect_keywords(args.keywords.as_deref(), args.keywords_file.as_deref())?;
        if keywords.is_empty() {
            bail!("Please enter at least one keyword.");
        }

        let text = args.format == OutputFormat::Text;
        if text && !quiet {
            println!("{}", "Scan Mode".bold().blue());
            println!("{}", "=========".blue());
            println!(
                "Searching {} for {} keywords: {}",
                args.folder.display(),
                keywords.len(),
                keywords.iter().collect::<Vec<_>>().join(", ").cyan()
            );
        }

        let scanner = Scanner::new(PdfExtractor).with_options(ScanOptions {
            recursive: args.recursive,
        });
        let progress = if quiet { ProgressBar::hidden() } else { progress_bar()? };
        let start = Instant::now();
        let report = scanner.scan_with_progress(&args.folder, &keywords, |p| {
            progress.set_length(p.total as u64);
            progress.set_position(p.index as u64);
            progress.set_message(p.name.to_string());
        })?;
        progress.finish_and_clear();

        if text {
            Self::display_results(&report, start.elapsed(), quiet);
        } else {
            println!("{}", render(&report.results, args.format)?);
        }

        if args.copy {
            copy_to_clipboard(&render(&report.results, args.format)?)?;
            if !quiet {
                eprintln!("{}", "Results copied to clipboard!".green());
            }
        }

        Ok(())
    }

    fn run_interactive() -> Result<()> {
        Self::show_startup_logo();

        println!("{}", "Interactive Mode".bold().blue());
        println!("{}", "=================".blue());

        let folder: String = Input::new()
            .with_prompt("Folder containing the documents")
            .validate_with(|input: &String| -> Result<(), &'static str> {
                if Path::new(input.trim()).is_dir() {
                    Ok(())
                } else {
                    Err("Invalid folder path. Please enter a valid directory.")
                }
            })
            .interact_text()?;

        let keywords: String = Input::new()
            .with_prompt("Keywords (comma-separated)")
            .validate_with(|input: &String| -> Result<(), &'static str> {
                if parse_keywords(input).is_empty() {
                    Err("Please enter at least one keyword.")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        let recursive = Confirm::new()
            .with_prompt("Include subfolders?")
            .default(false)
            .interact()?;

        println!("\n{}", "Searching...".green());

        let scanner = Scanner::new(PdfExtractor).with_options(ScanOptions { recursive });
        let start = Instant::now();
        let report = scanner.scan(Path::new(folder.trim()), &parse_keywords(&keywords))?;
        Self::display_results(&report, start.elapsed(), false);

        if !report.results.is_empty()
            && Confirm::new()
                .with_prompt("Copy results to clipboard?")
                .default(false)
                .interact()?
        {
            copy_to_clipboard(&render_text(&report.results))?;
            println!("{}", "Results copied to clipboard!".green());
        }

        Ok(())
    }

    fn run_tui(folder: Option<PathBuf>) -> Result<()> {
        let mut tui_app = TuiApp::new();
        if let Some(folder) = folder {
            tui_app = tui_app.with_folder(&folder);
        }
        tui_app.run()
    }

    fn run_list(folder: &Path, recursive: bool) -> Result<()> {
        let scanner = Scanner::new(PdfExtractor).with_options(ScanOptions { recursive });
        let files = scanner.list(folder)?;

        if files.is_empty() {
            println!("{}", format!("No PDF documents found in {}", folder.display()).yellow());
            return Ok(());
        }

        for file in &files {
            println!("{}", file.display());
        }
        println!("{}", format!("{} documents", files.len()).italic());
        Ok(())
    }

    fn run_info(file: &Path) -> Result<()> {
        println!("{}", "File Information".bold().blue());
        println!("{}", "================".blue());

        let size = file
            .metadata()
            .with_context(|| format!("File not found: {}", file.display()))?
            .len();

        let start = Instant::now();
        let text = PdfExtractor
            .extract_text(file)
            .with_context(|| format!("Failed to extract text from {}", file.display()))?;

        println!("File: {}", file.display());
        println!("Size: {} bytes", size);
        println!("Characters: {}", text.chars().count());
        println!("Lines: {}", text.lines().filter(|l| !l.trim().is_empty()).count());
        println!("Words: {}", text.split_whitespace().count());
        println!(
            "{}",
            format!("Extracted text in {} ms", start.elapsed().as_millis()).italic()
        );
        Ok(())
    }

    fn collect_keywords(inline: Option<&str>, file: Option<&Path>) -> Result<KeywordSet> {
        let mut keywords = KeywordSet::new();
        if let Some(path) = file {
            keywords.extend(read_keywords_from_file(path)?.iter());
        }
        if let Some(inline) = inline {
            keywords.extend(parse_keywords(inline).iter());
        }
        Ok(keywords)
    }

    fn display_results(report: &ScanReport, duration: Duration, quiet: bool) {
        if !quiet {
            println!("\n{}", "=".repeat(60).blue());
        }

        if report.results.is_empty() {
            println!("{}", NO_RESULTS.yellow());
        } else {
            println!("{}\n", RESULTS_HEADER.bold());
            for result in &report.results {
                println!("{}", result_line(result).green());
            }
        }

        if quiet {
            return;
        }

        println!("{}", "=".repeat(60).blue());
        if !report.failures.is_empty() {
            println!("{}", format!("Skipped {} unreadable documents:", report.failures.len()).red());
            for failure in &report.failures {
                println!("  {}: {}", failure.name.red(), failure.error);
            }
        }
        println!(
            "{}",
            format!(
                "Scanned {} documents in {} ms, {} matched",
                report.scanned,
                duration.as_millis(),
                report.results.len()
            )
            .italic()
        );
    }

    fn show_help() {
        println!("{}", "pdfrank - rank PDF documents by keywords".blue().bold());
        println!();
        println!("Usage:");
        println!("  pdfrank scan <folder> --keywords <list>");
        println!("  pdfrank scan <folder> --keywords-file <file>");
        println!("  pdfrank list <folder>");
        println!("  pdfrank info <file>");
        println!("  pdfrank --interactive");
        println!("  pdfrank --tui");
        println!();
        println!("Examples:");
        println!("  pdfrank scan ./resumes -k \"Python, SQL, Go\"");
        println!("  pdfrank scan ./resumes -k rust --recursive --format json");
        println!("  pdfrank scan ./resumes --keywords-file skills.txt --copy");
        println!("  pdfrank tui ./resumes");
        println!();
        println!("For more help, run: pdfrank --help");
    }

    fn show_startup_logo() {
        let logo = r#"
            _  __                 _
  _ __   __| |/ _|_ __ __ _ _ __ | | __
 | '_ \ / _` | |_| '__/ _` | '_ \| |/ /
 | |_) | (_| |  _| | | (_| | | | |   <
 | .__/ \__,_|_| |_|  \__,_|_| |_|_|\_\
 |_|
"#;
        println!("{}", logo);
        println!();
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs go to stderr. The TUI owns the terminal, so it only logs when `RUST_LOG` asks for it.
fn init_logging(verbose: bool, quiet: bool, tui: bool) {
    let default_level = if tui {
        "off"
    } else if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg}: [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("█▉▊▋▌▍▎▏ "),
    );
    Ok(pb)
}

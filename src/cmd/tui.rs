use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{io::stdout, path::Path};
use tui_input::{Input, InputRequest};

use crate::{
    cmd::output::{copy_to_clipboard, render_text},
    engine::{ScanOptions, Scanner},
    parsers::{PdfExtractor, TextExtractor},
    types::MatchResult,
    utils::parse_keywords,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Folder,
    Keywords,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Success,
    Error,
}

/// What the event loop should do after a key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Search,
    Copy,
    Quit,
}

pub struct TuiApp<E = PdfExtractor> {
    scanner: Scanner<E>,
    folder: Input,
    keywords: Input,
    focus: Field,
    results: Vec<MatchResult>,
    output: String,
    output_scroll: u16,
    status: String,
    status_kind: StatusKind,
}

impl TuiApp<PdfExtractor> {
    pub fn new() -> Self {
        Self::with_scanner(Scanner::new(PdfExtractor))
    }
}

impl Default for TuiApp<PdfExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TextExtractor> TuiApp<E> {
    pub fn with_scanner(scanner: Scanner<E>) -> Self {
        Self {
            scanner,
            folder: Input::default(),
            keywords: Input::default(),
            focus: Field::Folder,
            results: Vec::new(),
            output: String::new(),
            output_scroll: 0,
            status: READY.to_string(),
            status_kind: StatusKind::Info,
        }
    }

    pub fn with_folder(mut self, folder: &Path) -> Self {
        self.folder = Input::new(folder.to_string_lossy().into_owned());
        self.focus = Field::Keywords;
        self
    }

    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_app(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
        terminal.show_cursor()?;

        res
    }

    fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            let key = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key,
                _ => continue,
            };

            match self.handle_key(key) {
                Action::Quit => return Ok(()),
                Action::Search => {
                    self.set_status(StatusKind::Info, "Searching...");
                    self.output = "Searching...".to_string();
                    terminal.draw(|f| self.ui(f))?;
                    self.start_search();
                }
                Action::Copy => self.copy_results(),
                Action::None => {}
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Action::Quit,
            KeyCode::Char('y') if ctrl => Action::Copy,
            KeyCode::Char('r') if ctrl => {
                let recursive = !self.scanner.options().recursive;
                self.scanner.set_options(ScanOptions { recursive });
                let msg = if recursive {
                    "Subfolders included"
                } else {
                    "Subfolders excluded"
                };
                self.set_status(StatusKind::Info, msg);
                Action::None
            }
            KeyCode::Enter => Action::Search,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Field::Folder => Field::Keywords,
                    Field::Keywords => Field::Folder,
                };
                Action::None
            }
            KeyCode::Up => {
                self.output_scroll = self.output_scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                self.output_scroll = self.output_scroll.saturating_add(1);
                Action::None
            }
            _ => {
                if let Some(req) = input_request(key) {
                    self.focused_input_mut().handle(req);
                }
                Action::None
            }
        }
    }

    pub fn start_search(&mut self) {
        let folder = self.folder.value().trim().to_string();
        let keywords = parse_keywords(self.keywords.value());
        self.output_scroll = 0;

        if folder.is_empty() || keywords.is_empty() {
            self.output.clear();
            self.set_status(
                StatusKind::Error,
                "Please select a folder and enter at least one keyword.",
            );
            return;
        }

        match self.scanner.scan(Path::new(&folder), &keywords) {
            Ok(report) => {
                let mut output = render_text(&report.results);
                if !report.failures.is_empty() {
                    output.push_str("\nSkipped (could not read):\n");
                    for failure in &report.failures {
                        output.push_str(&format!("  {}: {}\n", failure.name, failure.error));
                    }
                }
                self.output = output;
                self.set_status(
                    StatusKind::Info,
                    &format!(
                        "Scanned {} documents, {} matched, {} skipped",
                        report.scanned,
                        report.results.len(),
                        report.failures.len()
                    ),
                );
                self.results = report.results;
            }
            Err(e) => {
                self.results.clear();
                self.output.clear();
                self.set_status(StatusKind::Error, &e.to_string());
            }
        }
    }

    fn copy_results(&mut self) {
        if self.results.is_empty() {
            self.set_status(StatusKind::Error, "Nothing to copy");
            return;
        }
        match copy_to_clipboard(&render_text(&self.results)) {
            Ok(()) => self.set_status(StatusKind::Success, "Results copied to clipboard!"),
            Err(e) => self.set_status(StatusKind::Error, &format!("{:#}", e)),
        }
    }

    fn set_status(&mut self, kind: StatusKind, msg: &str) {
        self.status_kind = kind;
        self.status = msg.to_string();
    }

    fn focused_input_mut(&mut self) -> &mut Input {
        match self.focus {
            Field::Folder => &mut self.folder,
            Field::Keywords => &mut self.keywords,
        }
    }

    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Length(1), // Header
                    Constraint::Length(3), // Folder
                    Constraint::Length(3), // Keywords
                    Constraint::Min(0),    // Results
                    Constraint::Length(3), // Status bar
                ]
                .as_ref(),
            )
            .split(f.size());

        self.draw_header(f, chunks[0]);
        self.draw_input(f, chunks[1], Field::Folder);
        self.draw_input(f, chunks[2], Field::Keywords);
        self.draw_results(f, chunks[3]);
        self.draw_status_bar(f, chunks[4]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let recursive = if self.scanner.options().recursive {
            " (with subfolders)"
        } else {
            ""
        };
        let title = Line::from(vec![
            Span::styled("pdfrank", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
            Span::raw(" - rank documents by keywords matched"),
            Span::styled(recursive, Style::default().fg(Color::Gray)),
        ]);
        f.render_widget(Paragraph::new(title), area);
    }

    fn draw_input(&self, f: &mut Frame, area: Rect, field: Field) {
        let (input, title) = match field {
            Field::Folder => (&self.folder, "Folder containing the documents"),
            Field::Keywords => (&self.keywords, "Keywords (comma-separated)"),
        };
        let focused = self.focus == field;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let width = area.width.saturating_sub(2) as usize;
        let scroll = input.visual_scroll(width);
        let paragraph = Paragraph::new(input.value())
            .scroll((0, scroll as u16))
            .block(Block::default().title(title).borders(Borders::ALL).border_style(border));
        f.render_widget(paragraph, area);

        if focused {
            let cursor = input.visual_cursor().saturating_sub(scroll) as u16;
            f.set_cursor(area.x + 1 + cursor, area.y + 1);
        }
    }

    fn draw_results(&self, f: &mut Frame, area: Rect) {
        let text = if self.output.is_empty() {
            "Enter a folder and keywords, then press Enter to start screening."
        } else {
            self.output.as_str()
        };
        let results = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((self.output_scroll, 0))
            .block(Block::default().title("Results").borders(Borders::ALL));
        f.render_widget(results, area);
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let color = match self.status_kind {
            StatusKind::Info => Color::White,
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        };
        let status = Paragraph::new(vec![
            Line::from(Span::styled(self.status.as_str(), Style::default().fg(color))),
            Line::from(Span::styled(HELP, Style::default().fg(Color::Gray))),
        ])
        .block(Block::default().borders(Borders::TOP));
        f.render_widget(status, area);
    }
}

const READY: &str = "Ready";
const HELP: &str = "Tab switch field | Enter search | Ctrl+R subfolders | Ctrl+Y copy | Up/Down scroll | Esc quit";

fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char(c) if !ctrl => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::text::PlainTextExtractor;
    use std::fs;

    fn app() -> TuiApp<PlainTextExtractor> {
        TuiApp::with_scanner(Scanner::new(PlainTextExtractor))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut TuiApp<PlainTextExtractor>, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_key(key(KeyCode::Char(c))), Action::None);
        }
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut app = app();
        type_text(&mut app, "/tmp");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "rust");
        app.handle_key(key(KeyCode::Backspace));

        assert_eq!(app.folder.value(), "/tmp");
        assert_eq!(app.keywords.value(), "rus");
    }

    #[test]
    fn test_control_keys_map_to_actions() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::Search);
        assert_eq!(app.handle_key(ctrl('y')), Action::Copy);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(app.handle_key(ctrl('c')), Action::Quit);
        assert_eq!(app.folder.value(), "");
    }

    #[test]
    fn test_ctrl_r_toggles_subfolders() {
        let mut app = app();
        app.handle_key(ctrl('r'));
        assert!(app.scanner.options().recursive);
        app.handle_key(ctrl('r'));
        assert!(!app.scanner.options().recursive);
    }

    #[test]
    fn test_search_requires_inputs() {
        let mut app = app();
        app.start_search();
        assert_eq!(app.status_kind, StatusKind::Error);
        assert!(app.results().is_empty());
    }

    #[test]
    fn test_search_reports_invalid_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app().with_folder(&dir.path().join("missing"));
        type_text(&mut app, "python");
        app.start_search();

        assert_eq!(app.status_kind, StatusKind::Error);
        assert!(app.status.starts_with("Invalid folder"));
    }

    #[test]
    fn test_search_renders_ranked_results() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alice.pdf"), "Python and SQL").unwrap();
        fs::write(dir.path().join("bob.pdf"), "Python only").unwrap();
        fs::write(dir.path().join("broken.pdf"), [0xffu8, 0xfe]).unwrap();

        let mut app = app().with_folder(dir.path());
        type_text(&mut app, " Python , SQL, Go");
        app.start_search();

        assert_eq!(app.status_kind, StatusKind::Info);
        assert_eq!(app.status, "Scanned 3 documents, 2 matched, 1 skipped");
        assert_eq!(app.results().len(), 2);
        assert!(app
            .output
            .contains("alice.pdf — 2 matched: python, sql\nbob.pdf — 1 matched: python\n"));
        assert!(app.output.contains("broken.pdf"));
    }

    #[test]
    fn test_copy_without_results() {
        let mut app = app();
        app.copy_results();
        assert_eq!(app.status, "Nothing to copy");
    }
}

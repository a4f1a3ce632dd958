pub mod cli;
pub mod output;
pub mod tui;

pub use cli::CliApp;
pub use output::OutputFormat;
pub use tui::TuiApp;

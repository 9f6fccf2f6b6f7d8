//! Output formatting for CLI commands
//!
//! Every command produces one report. In JSON mode the report is a single
//! compact line on stdout; in text mode the command renders it itself.

use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Report writer shared by all commands
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Emits `report` as JSON, or calls `render` to print it as text
    pub fn report<T: Serialize>(&self, report: &T, render: impl FnOnce()) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string(report) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error: cannot encode report: {}", e),
            },
            OutputFormat::Text => render(),
        }
    }

    /// Prints a problem found while inspecting a project (text only)
    pub fn problem(&self, message: &str) {
        if self.format == OutputFormat::Text {
            eprintln!("problem: {}", message);
        }
    }

    /// Prints fields tab-separated (text only)
    pub fn row(&self, columns: &[&str]) {
        if self.format == OutputFormat::Text {
            println!("{}", columns.join("\t"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn text_mode_renders() {
        let rendered = Cell::new(false);
        Output::new(OutputFormat::Text).report(&serde_json::json!({}), || rendered.set(true));
        assert!(rendered.get());
    }

    #[test]
    fn json_mode_skips_renderer() {
        let rendered = Cell::new(false);
        Output::new(OutputFormat::Json).report(&serde_json::json!({"ok": true}), || {
            rendered.set(true)
        });
        assert!(!rendered.get());
    }
}

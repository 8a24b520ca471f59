//! Output formatting utilities.
//!
//! Every command result implements [`OutputFormatter`] so it can be printed as
//! plain text, colored text, JSON or JSON Lines.

use clap::ValueEnum;
use nu_ansi_term::Color;
use serde::Serialize;
use serts_typegen::{Diagnostic, Report, Severity};
use std::io::IsTerminal;

/// Color output mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on TTY (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Output format and display mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output.
    #[default]
    Compact,
    /// Text output with colors.
    Pretty,
    /// JSON output.
    Json,
    /// JSON Lines output (arrays emit each element on its own line).
    JsonLines,
}

impl OutputFormat {
    /// Resolve from CLI flags. JSON modes take precedence.
    pub fn from_cli(json: bool, jsonl: bool, color: ColorMode) -> Self {
        if jsonl {
            return OutputFormat::JsonLines;
        }
        if json {
            return OutputFormat::Json;
        }

        let use_colors = match color {
            ColorMode::Never => false,
            ColorMode::Always => true,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        };
        if use_colors {
            OutputFormat::Pretty
        } else {
            OutputFormat::Compact
        }
    }
}

/// Types that can be printed in every [`OutputFormat`].
pub trait OutputFormatter: Serialize {
    /// Format as plain text.
    fn format_text(&self) -> String;

    /// Format as colored text. Falls back to `format_text()`.
    fn format_pretty(&self) -> String {
        self.format_text()
    }

    /// Value emitted in JSON Lines mode. Arrays produce one line per element.
    fn jsonl_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Render in the given format, without a trailing newline.
    fn render(&self, format: &OutputFormat) -> String {
        match format {
            OutputFormat::Compact => self.format_text(),
            OutputFormat::Pretty => self.format_pretty(),
            OutputFormat::Json => serde_json::to_string(self).unwrap_or_default(),
            OutputFormat::JsonLines => match self.jsonl_value() {
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|item| serde_json::to_string(item).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join("\n"),
                value => serde_json::to_string(&value).unwrap_or_default(),
            },
        }
    }

    /// Print to stdout in the given format.
    fn print(&self, format: &OutputFormat) {
        let text = self.render(format);
        if !text.is_empty() {
            println!("{text}");
        }
    }
}

/// A diagnostic line with the severity colored.
pub fn pretty_diagnostic(diagnostic: &Diagnostic) -> String {
    let plain = diagnostic.to_string();
    let label = diagnostic.severity.to_string();
    let colored = match diagnostic.severity {
        Severity::Error => Color::Red.bold().paint(label.as_str()),
        Severity::Warning => Color::Yellow.bold().paint(label.as_str()),
    };
    format!("{colored}{}", &plain[label.len()..])
}

/// Colored counterpart of [`Report::format_text`].
pub fn pretty_report(report: &Report) -> String {
    let mut lines: Vec<String> = report.iter().map(pretty_diagnostic).collect();
    let errors = report.errors().count();
    let warnings = report.warnings().count();
    let summary = format!("{errors} error(s), {warnings} warning(s)");
    lines.push(if errors > 0 {
        Color::Red.paint(summary).to_string()
    } else if warnings > 0 {
        Color::Yellow.paint(summary).to_string()
    } else {
        Color::Green.paint(summary).to_string()
    });
    lines.join("\n")
}

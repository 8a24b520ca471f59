//! Generate command - translate descriptors and write TypeScript files.

use super::{InputArgs, TypeScriptArgs, apply_overrides, load_schemas};
use crate::config::SertsConfig;
use crate::output::{OutputFormat, OutputFormatter, pretty_report};
use crate::writer::{WriteStatus, WriteSummary, write_outputs};
use anyhow::Context;
use clap::Args;
use nu_ansi_term::Color;
use serde::Serialize;
use serts_typegen::{Report, TranslateError, translate};
use std::path::PathBuf;

/// Generate command arguments
#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub typescript: TypeScriptArgs,

    /// Output directory (defaults to `output.dir` from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Treat warnings like errors
    #[arg(long)]
    pub deny_warnings: bool,

    /// Write files even when the report has errors
    #[arg(long)]
    pub force: bool,
}

/// Outcome of one generate run.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Present when files were written (or would be, in a dry run).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written: Option<WriteSummary>,
    /// Why writing was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
    pub diagnostics: Report,
}

impl GenerateReport {
    /// 0 when written, 2 when the report gated the write, 1 for malformed input.
    pub fn exit_code(&self) -> i32 {
        match &self.skipped {
            None => 0,
            Some(_) if self.diagnostics.has_structural() => 1,
            Some(_) => 2,
        }
    }

    fn summary_line(&self) -> String {
        match (&self.written, &self.skipped) {
            (_, Some(reason)) => format!("nothing written: {reason}"),
            (Some(summary), None) => format!(
                "{}{} created, {} updated, {} unchanged in {}",
                if summary.dry_run { "(dry run) " } else { "" },
                summary.count(WriteStatus::Created),
                summary.count(WriteStatus::Updated),
                summary.count(WriteStatus::Unchanged),
                self.output_dir.display()
            ),
            (None, None) => String::new(),
        }
    }

    fn changed_paths(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        self.written.iter().flat_map(|summary| {
            summary.files.iter().filter_map(|f| {
                let label = match f.status {
                    WriteStatus::Created => "created",
                    WriteStatus::Updated => "updated",
                    WriteStatus::Unchanged => return None,
                };
                Some((label, f.path.display().to_string()))
            })
        })
    }
}

impl OutputFormatter for GenerateReport {
    fn format_text(&self) -> String {
        let mut lines: Vec<String> = self
            .changed_paths()
            .map(|(label, path)| format!("{label} {path}"))
            .collect();
        if !self.diagnostics.is_empty() {
            lines.push(self.diagnostics.format_text());
        }
        lines.push(self.summary_line());
        lines.join("\n")
    }

    fn format_pretty(&self) -> String {
        let mut lines: Vec<String> = self
            .changed_paths()
            .map(|(label, path)| format!("{} {path}", Color::Green.paint(label)))
            .collect();
        if !self.diagnostics.is_empty() {
            lines.push(pretty_report(&self.diagnostics));
        }
        let summary = self.summary_line();
        lines.push(if self.skipped.is_some() {
            Color::Red.bold().paint(summary).to_string()
        } else {
            Color::Default.bold().paint(summary).to_string()
        });
        lines.join("\n")
    }
}

/// Translate and write.
pub fn generate(args: &GenerateArgs, config: SertsConfig) -> anyhow::Result<GenerateReport> {
    let config = apply_overrides(config, &args.input, &args.typescript);
    let output_dir = args
        .output
        .clone()
        .or_else(|| config.output.dir.clone())
        .context("no output directory: pass --output or set output.dir in config")?;

    let schemas = load_schemas(&args.input, &config)?;
    let options = config.typescript_options();

    let translation = match translate(&schemas, &options) {
        Ok(t) => t,
        Err(TranslateError::Malformed { report }) => {
            let report = GenerateReport {
                output_dir,
                written: None,
                skipped: Some("descriptor set is malformed".to_string()),
                diagnostics: report,
            };
            return Ok(report);
        }
    };

    let has_errors = translation.report.has_errors();
    let has_warnings = translation.report.warnings().next().is_some();
    let gate = if args.force {
        None
    } else if has_errors {
        Some("the report has errors (use --force to write anyway)")
    } else if args.deny_warnings && has_warnings {
        Some("the report has warnings and --deny-warnings is set")
    } else {
        None
    };

    if let Some(reason) = gate {
        tracing::warn!(reason, "skipping write");
        let report = GenerateReport {
            output_dir,
            written: None,
            skipped: Some(reason.to_string()),
            diagnostics: translation.report,
        };
        return Ok(report);
    }

    let summary = write_outputs(&output_dir, translation.outputs(), args.dry_run)?;
    tracing::info!(
        dir = %output_dir.display(),
        created = summary.count(WriteStatus::Created),
        updated = summary.count(WriteStatus::Updated),
        unchanged = summary.count(WriteStatus::Unchanged),
        dry_run = args.dry_run,
        "wrote outputs"
    );

    let report = GenerateReport {
        output_dir,
        written: Some(summary),
        skipped: None,
        diagnostics: translation.report,
    };
    Ok(report)
}

/// Run the generate command
pub fn run(args: GenerateArgs, config: SertsConfig, format: &OutputFormat) -> i32 {
    match generate(&args, config) {
        Ok(report) => {
            report.print(format);
            report.exit_code()
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

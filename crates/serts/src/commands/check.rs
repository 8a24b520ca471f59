//! Check command - translate without writing and report problems.

use super::{InputArgs, TypeScriptArgs, apply_overrides, load_schemas};
use crate::config::SertsConfig;
use crate::output::{OutputFormat, OutputFormatter, pretty_report};
use clap::Args;
use serde::Serialize;
use serts_typegen::{Report, TranslateError, translate};

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub typescript: TypeScriptArgs,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub deny_warnings: bool,
}

/// Outcome of checking one descriptor set.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// False when the descriptor set could not be translated at all.
    pub translated: bool,
    pub files: Vec<String>,
    pub diagnostics: Report,
}

impl CheckReport {
    pub fn fails(&self, deny_warnings: bool) -> bool {
        !self.translated
            || self.diagnostics.has_errors()
            || (deny_warnings && self.diagnostics.warnings().next().is_some())
    }

    fn heading(&self) -> String {
        if self.translated {
            format!("{} file(s) would be generated", self.files.len())
        } else {
            "descriptor set is malformed; nothing can be generated".to_string()
        }
    }
}

impl OutputFormatter for CheckReport {
    fn format_text(&self) -> String {
        format!("{}\n{}", self.heading(), self.diagnostics.format_text())
    }

    fn format_pretty(&self) -> String {
        format!("{}\n{}", self.heading(), pretty_report(&self.diagnostics))
    }

    fn jsonl_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.diagnostics).unwrap_or_default()
    }
}

/// Translate the descriptors and print the report.
pub fn check(args: &CheckArgs, config: SertsConfig) -> anyhow::Result<CheckReport> {
    let config = apply_overrides(config, &args.input, &args.typescript);
    let schemas = load_schemas(&args.input, &config)?;
    let options = config.typescript_options();

    Ok(match translate(&schemas, &options) {
        Ok(translation) => CheckReport {
            translated: true,
            files: translation.outputs().map(|f| f.path.clone()).collect(),
            diagnostics: translation.report,
        },
        Err(TranslateError::Malformed { report }) => CheckReport {
            translated: false,
            files: Vec::new(),
            diagnostics: report,
        },
    })
}

/// Run the check command
pub fn run(args: CheckArgs, config: SertsConfig, format: &OutputFormat) -> i32 {
    match check(&args, config) {
        Ok(report) => {
            report.print(format);
            if report.fails(args.deny_warnings) { 1 } else { 0 }
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

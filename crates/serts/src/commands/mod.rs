//! Command-line interface.

pub mod check;
pub mod generate;
pub mod graph;

use crate::config::{NamingConfig, SertsConfig, TypeScriptConfig};
use crate::load::{InputFormat, read_descriptors};
use crate::output::{ColorMode, OutputFormat};
use clap::{ArgAction, Args, Parser, Subcommand};
use serts_typegen::{OptionalStyle, SchemaDescriptor, UnknownStyle, strip_name_suffix};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "serts", version, about = "Generate TypeScript interfaces from serializer descriptors")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of .serts/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as JSON Lines
    #[arg(long, global = true)]
    pub jsonl: bool,

    /// Color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate descriptors and write TypeScript files
    Generate(generate::GenerateArgs),
    /// Translate descriptors and report problems without writing
    Check(check::CheckArgs),
    /// Show resolved imports and reference cycles
    Graph(graph::GraphArgs),
}

/// Where descriptors come from.
#[derive(Args)]
pub struct InputArgs {
    /// Descriptor file (JSON or YAML), use - for stdin
    pub input: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    /// Strip this suffix from schema names (e.g. Serializer)
    #[arg(long)]
    pub strip_suffix: Option<String>,
}

/// Flags overriding the `[typescript]` config section.
#[derive(Args, Default)]
pub struct TypeScriptArgs {
    /// Mark every property optional
    #[arg(long)]
    pub all_optional: bool,

    /// Mark every property readonly
    #[arg(long)]
    pub readonly: bool,

    /// Type unmappable fields as `any` instead of `unknown`
    #[arg(long)]
    pub any: bool,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_cli(self.json, self.jsonl, self.color)
    }
}

/// Run the parsed command line. Returns the process exit code.
pub fn run(cli: Cli) -> i32 {
    let format = cli.output_format();
    let config = match SertsConfig::load(Path::new("."), cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e:#}");
            return 1;
        }
    };

    match cli.command {
        Commands::Generate(args) => generate::run(args, config, &format),
        Commands::Check(args) => check::run(args, config, &format),
        Commands::Graph(args) => graph::run(args, config, &format),
    }
}

/// Fold command-line overrides into the loaded config.
pub(crate) fn apply_overrides(
    config: SertsConfig,
    input: &InputArgs,
    ts: &TypeScriptArgs,
) -> SertsConfig {
    let overrides = SertsConfig {
        typescript: TypeScriptConfig {
            readonly: ts.readonly.then_some(true),
            optional: ts.all_optional.then_some(OptionalStyle::Always),
            unknown: ts.any.then_some(UnknownStyle::Any),
            ..Default::default()
        },
        naming: NamingConfig {
            strip_suffix: input.strip_suffix.clone(),
        },
        ..Default::default()
    };
    config.merge(overrides)
}

/// Read descriptors and apply name normalization.
pub(crate) fn load_schemas(
    input: &InputArgs,
    config: &SertsConfig,
) -> anyhow::Result<Vec<SchemaDescriptor>> {
    let mut schemas = read_descriptors(&input.input, input.format)?;
    if let Some(suffix) = config.naming.strip_suffix.as_deref().filter(|s| !s.is_empty()) {
        strip_name_suffix(&mut schemas, suffix);
    }
    Ok(schemas)
}

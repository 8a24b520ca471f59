//! Graph command - show how schemas reference each other.

use super::{InputArgs, load_schemas};
use crate::config::SertsConfig;
use crate::output::{OutputFormat, OutputFormatter, pretty_diagnostic};
use clap::Args;
use nu_ansi_term::Color;
use serde::Serialize;
use serts_typegen::graph::qualified_name;
use serts_typegen::{Cycle, Diagnostic, ImportRequirement, SchemaGraph};

#[derive(Args)]
pub struct GraphArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
pub struct SchemaNode {
    pub schema: String,
    pub imports: Vec<ImportRequirement>,
    pub self_reference: bool,
}

/// Resolved references of a descriptor set.
#[derive(Debug, Serialize)]
pub struct GraphReport {
    pub schemas: Vec<SchemaNode>,
    pub cycles: Vec<Cycle>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GraphReport {
    fn render(&self, colors: bool) -> String {
        let mut out = Vec::new();
        for node in &self.schemas {
            let name = if colors {
                Color::Cyan.bold().paint(node.schema.as_str()).to_string()
            } else {
                node.schema.clone()
            };
            let suffix = if node.self_reference { " (self)" } else { "" };
            out.push(format!("{name}{suffix}"));
            for import in &node.imports {
                out.push(format!("  -> {} ({})", import.name, import.specifier));
            }
        }

        if !self.cycles.is_empty() {
            out.push(String::new());
            out.push(format!("{} cycle(s):", self.cycles.len()));
            for cycle in &self.cycles {
                let mut names = cycle.schemas.clone();
                if let Some(first) = names.first().cloned() {
                    names.push(first);
                }
                out.push(format!("  {}", names.join(" -> ")));
            }
        }

        if !self.diagnostics.is_empty() {
            out.push(String::new());
            for diagnostic in &self.diagnostics {
                out.push(if colors {
                    pretty_diagnostic(diagnostic)
                } else {
                    diagnostic.to_string()
                });
            }
        }
        out.join("\n")
    }
}

impl OutputFormatter for GraphReport {
    fn format_text(&self) -> String {
        self.render(false)
    }

    fn format_pretty(&self) -> String {
        self.render(true)
    }

    fn jsonl_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.schemas).unwrap_or_default()
    }
}

/// Resolve every reference in the descriptor set.
pub fn graph(args: &GraphArgs, config: SertsConfig) -> anyhow::Result<GraphReport> {
    let config = config.merge(SertsConfig {
        naming: crate::config::NamingConfig {
            strip_suffix: args.input.strip_suffix.clone(),
        },
        ..Default::default()
    });
    let mut schemas = load_schemas(&args.input, &config)?;
    schemas.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let graph = SchemaGraph::build(&schemas);
    let nodes = schemas
        .iter()
        .enumerate()
        .map(|(i, schema)| SchemaNode {
            schema: qualified_name(schema),
            imports: graph.imports(i).to_vec(),
            self_reference: graph.has_self_reference(i),
        })
        .collect();

    Ok(GraphReport {
        schemas: nodes,
        cycles: graph.cycles(),
        diagnostics: graph.diagnostics().to_vec(),
    })
}

/// Run the graph command
pub fn run(args: GraphArgs, config: SertsConfig, format: &OutputFormat) -> i32 {
    match graph(&args, config) {
        Ok(report) => {
            report.print(format);
            0
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

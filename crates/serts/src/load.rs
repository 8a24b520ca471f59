//! Reading descriptor documents from disk or stdin.

use anyhow::Context;
use clap::ValueEnum;
use serts_typegen::{DescriptorDocument, SchemaDescriptor};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Detect from the file extension, then from the content
    Auto,
    Json,
    Yaml,
}

/// Read a descriptor document. `-` reads stdin.
pub fn read_descriptors(input: &Path, format: InputFormat) -> anyhow::Result<Vec<SchemaDescriptor>> {
    let content = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };

    let format = match format {
        InputFormat::Auto => detect_format(input, &content),
        other => other,
    };
    let schemas = parse_descriptors(&content, format)
        .with_context(|| format!("invalid descriptors in {}", display_input(input)))?;
    tracing::debug!(count = schemas.len(), format = ?format, "loaded descriptors");
    Ok(schemas)
}

/// Parse descriptors from text. Accepts either `{"schemas": [...]}` or a bare
/// array of schemas.
pub fn parse_descriptors(content: &str, format: InputFormat) -> anyhow::Result<Vec<SchemaDescriptor>> {
    let value: serde_json::Value = match format {
        InputFormat::Yaml => serde_yaml::from_str(content).context("failed to parse YAML")?,
        _ => serde_json::from_str(content).context("failed to parse JSON")?,
    };

    // A bare array is wrapped so both shapes share one error path.
    let value = match value {
        serde_json::Value::Array(items) => serde_json::json!({ "schemas": items }),
        other => other,
    };
    let document: DescriptorDocument = serde_json::from_value(value)?;
    Ok(document.schemas)
}

fn detect_format(input: &Path, content: &str) -> InputFormat {
    match input.extension().and_then(|e| e.to_str()) {
        Some("json") => InputFormat::Json,
        Some("yaml" | "yml") => InputFormat::Yaml,
        _ => {
            let trimmed = content.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                InputFormat::Json
            } else {
                InputFormat::Yaml
            }
        }
    }
}

fn display_input(input: &Path) -> String {
    if input.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}

//! The translation pass: descriptors in, files and a report out.

use crate::descriptor::SchemaDescriptor;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Report};
use crate::emit::{emit_index, emit_interface, is_identifier, is_reserved_name};
use crate::graph::SchemaGraph;
use crate::mapper::unmappable;
use crate::options::TypeScriptOptions;
use crate::paths::file_path;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// One generated file, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    /// `/`-separated path, e.g. `blog/Post.ts`.
    pub path: String,
    pub contents: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// One file per schema, in (module path, name) order.
    pub files: Vec<OutputFile>,
    pub index: OutputFile,
    pub report: Report,
}

impl Translation {
    /// Schema files followed by the index.
    pub fn outputs(&self) -> impl Iterator<Item = &OutputFile> {
        self.files.iter().chain(std::iter::once(&self.index))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// The descriptor set itself is unusable. Carries everything found so far.
    #[error("malformed schema descriptors ({} problem(s))", .report.errors().count())]
    Malformed { report: Report },
}

impl TranslateError {
    pub fn report(&self) -> &Report {
        match self {
            TranslateError::Malformed { report } => report,
        }
    }
}

/// Translate a schema set into TypeScript files.
///
/// The input order does not matter: schemas are processed sorted by module
/// path, then name, and the same input always yields the same output.
pub fn translate(
    schemas: &[SchemaDescriptor],
    options: &TypeScriptOptions,
) -> Result<Translation, TranslateError> {
    let mut sorted: Vec<SchemaDescriptor> = schemas.to_vec();
    sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let mut report = Report::new();
    report.extend(validate(&sorted, options));
    if report.has_structural() {
        report.normalize();
        return Err(TranslateError::Malformed { report });
    }

    for schema in &sorted {
        for field in &schema.fields {
            if let Some(reason) = unmappable(field) {
                report.push(Diagnostic::new(
                    schema.display_path(),
                    &schema.name,
                    Some(&field.name),
                    DiagnosticKind::UnmappableField { reason },
                ));
            }
        }
    }

    // Imports need every name resolved before any file is emitted.
    let graph = SchemaGraph::build(&sorted);
    report.extend(graph.diagnostics().iter().cloned());
    if tracing::enabled!(tracing::Level::DEBUG) {
        for cycle in graph.cycles() {
            tracing::debug!(schemas = ?cycle.schemas, "reference cycle");
        }
    }

    let files: Vec<OutputFile> = sorted
        .par_iter()
        .enumerate()
        .map(|(i, schema)| OutputFile {
            path: file_path(&schema.module_path, &schema.name, &options.extension),
            contents: emit_interface(schema, graph.imports(i), graph.degraded_fields(i), options),
        })
        .collect();

    let (index_text, index_diagnostics) = emit_index(&sorted, options);
    report.extend(index_diagnostics);
    report.normalize();

    tracing::info!(
        files = files.len(),
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "translated schemas"
    );

    Ok(Translation {
        files,
        index: OutputFile {
            path: options.index_file.clone(),
            contents: index_text,
        },
        report,
    })
}

// Structural checks. Anything reported here aborts the run.
fn validate(schemas: &[SchemaDescriptor], options: &TypeScriptOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen: HashSet<(&[String], &str)> = HashSet::new();
    let index_path = normalize_relative(&options.index_file);

    for schema in schemas {
        let module = schema.display_path();
        if !is_identifier(&schema.name) {
            diagnostics.push(Diagnostic::new(
                &module,
                &schema.name,
                None,
                DiagnosticKind::InvalidName {
                    name: schema.name.clone(),
                },
            ));
        } else if is_reserved_name(&schema.name) {
            diagnostics.push(Diagnostic::new(
                &module,
                &schema.name,
                None,
                DiagnosticKind::ReservedName {
                    name: schema.name.clone(),
                },
            ));
        }
        let path = file_path(&schema.module_path, &schema.name, &options.extension);
        if path == index_path {
            diagnostics.push(Diagnostic::new(
                &module,
                &schema.name,
                None,
                DiagnosticKind::OutputCollision { path },
            ));
        }
        for segment in &schema.module_path {
            if !is_directory_name(segment) {
                diagnostics.push(Diagnostic::new(
                    &module,
                    &schema.name,
                    None,
                    DiagnosticKind::InvalidModuleSegment {
                        segment: segment.clone(),
                    },
                ));
            }
        }
        if !seen.insert(schema.sort_key()) {
            diagnostics.push(Diagnostic::new(
                &module,
                &schema.name,
                None,
                DiagnosticKind::DuplicateSchema,
            ));
        }

        let mut fields: HashSet<&str> = HashSet::new();
        for field in &schema.fields {
            if field.name.is_empty() {
                diagnostics.push(Diagnostic::new(
                    &module,
                    &schema.name,
                    None,
                    DiagnosticKind::InvalidName {
                        name: String::new(),
                    },
                ));
            } else if !fields.insert(field.name.as_str()) {
                diagnostics.push(Diagnostic::new(
                    &module,
                    &schema.name,
                    Some(&field.name),
                    DiagnosticKind::DuplicateField,
                ));
            }
        }
    }
    diagnostics
}

// `./a//b.ts` and `a/b.ts` name the same file.
fn normalize_relative(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn is_directory_name(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

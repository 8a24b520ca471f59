//! Diagnostics collected during a translation pass.
//!
//! Nothing in the engine aborts on a single bad field or schema. Problems are
//! recorded here and returned with whatever output could still be produced;
//! only structural problems (see [`DiagnosticKind::is_structural`]) make a run
//! fatal.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    #[error("references unknown schema `{referenced}`")]
    UnresolvedReference { referenced: String },

    #[error("reference to `{referenced}` is ambiguous between {}", .candidates.join(", "))]
    AmbiguousReference {
        referenced: String,
        candidates: Vec<String>,
    },

    #[error("`{name}` is exported from several modules ({}); none are re-exported", .module_paths.join(", "))]
    AmbiguousExport {
        name: String,
        module_paths: Vec<String>,
    },

    #[error("{reason}; typed as the fallback type")]
    UnmappableField { reason: String },

    #[error("`{name}` is not a valid identifier")]
    InvalidName { name: String },

    #[error("`{name}` is reserved in TypeScript and cannot name an interface")]
    ReservedName { name: String },

    #[error("output file `{path}` is also the index file")]
    OutputCollision { path: String },

    #[error("module path segment `{segment}` is not a directory name")]
    InvalidModuleSegment { segment: String },

    #[error("schema is declared more than once in the same module")]
    DuplicateSchema,

    #[error("field is declared more than once")]
    DuplicateField,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnmappableField { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Structural problems make the input unusable as a whole.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::InvalidName { .. }
                | DiagnosticKind::ReservedName { .. }
                | DiagnosticKind::OutputCollision { .. }
                | DiagnosticKind::InvalidModuleSegment { .. }
                | DiagnosticKind::DuplicateSchema
                | DiagnosticKind::DuplicateField
        )
    }
}

/// One reported problem, keyed by schema and optionally field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Module path of the schema joined with `/`, empty at the root.
    pub module: String,
    pub schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        module: impl Into<String>,
        schema: impl Into<String>,
        field: Option<&str>,
        kind: DiagnosticKind,
    ) -> Self {
        Self {
            severity: kind.severity(),
            module: module.into(),
            schema: schema.into(),
            field: field.map(String::from),
            message: kind.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity)?;
        if !self.module.is_empty() {
            write!(f, "{}/", self.module)?;
        }
        f.write_str(&self.schema)?;
        if let Some(field) = &self.field {
            write!(f, ".{field}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// All diagnostics of one run, in a deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Sort by location, then kind, and drop exact duplicates.
    pub(crate) fn normalize(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            (&a.module, &a.schema, &a.field, &a.kind).cmp(&(&b.module, &b.schema, &b.field, &b.kind))
        });
        self.diagnostics.dedup();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn has_structural(&self) -> bool {
        self.iter().any(|d| d.kind.is_structural())
    }

    /// Minimal text form, one diagnostic per line.
    pub fn format_text(&self) -> String {
        let mut lines: Vec<String> = self.iter().map(ToString::to_string).collect();
        let errors = self.errors().count();
        let warnings = self.warnings().count();
        lines.push(format!("{errors} error(s), {warnings} warning(s)"));
        lines.join("\n")
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_kind() {
        let warn = Diagnostic::new(
            "blog",
            "Post",
            Some("meta"),
            DiagnosticKind::UnmappableField {
                reason: "unsupported field class `X`".into(),
            },
        );
        assert_eq!(warn.severity, Severity::Warning);
        assert_eq!(
            warn.to_string(),
            "warning: blog/Post.meta: unsupported field class `X`; typed as the fallback type"
        );

        let err = Diagnostic::new(
            "blog",
            "Post",
            Some("author"),
            DiagnosticKind::UnresolvedReference {
                referenced: "User".into(),
            },
        );
        assert_eq!(err.severity, Severity::Error);
        assert!(!err.kind.is_structural());
    }

    #[test]
    fn report_is_sorted_and_deduplicated() {
        let unresolved = |module: &str| {
            Diagnostic::new(
                module,
                "S",
                Some("f"),
                DiagnosticKind::UnresolvedReference {
                    referenced: "X".into(),
                },
            )
        };
        let mut report = Report::new();
        report.push(unresolved("b"));
        report.push(unresolved("a"));
        report.push(unresolved("a"));
        report.normalize();

        let modules: Vec<_> = report.iter().map(|d| d.module.as_str()).collect();
        assert_eq!(modules, ["a", "b"]);
        assert!(report.has_errors());
        assert!(!report.has_structural());
    }

    #[test]
    fn serializes_flat() {
        let d = Diagnostic::new(
            "",
            "Item",
            None,
            DiagnosticKind::AmbiguousExport {
                name: "Item".into(),
                module_paths: vec!["catalog".into(), "orders".into()],
            },
        );
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["kind"], "ambiguous_export");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["module_paths"][1], "orders");
        assert!(value.get("field").is_none());
    }
}

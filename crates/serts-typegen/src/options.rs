//! Output options for the TypeScript emitters.

use crate::ir::UnknownStyle;
use serde::Deserialize;

/// How `?` is applied to properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionalStyle {
    /// Only fields declared optional get `?`.
    #[default]
    Declared,
    /// Every property gets `?`.
    Always,
}

/// Options shared by the interface and index emitters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TypeScriptOptions {
    /// Prefix declarations with `export`.
    pub export: bool,
    /// Mark every property `readonly`.
    pub readonly: bool,
    pub optional: OptionalStyle,
    pub unknown: UnknownStyle,
    /// Use `import type { .. }` instead of `import { .. }`.
    pub type_imports: bool,
    /// File extension of generated files, without the dot.
    pub extension: String,
    /// Index file path, relative to the output root.
    pub index_file: String,
    /// Banner placed as a line comment at the top of every generated file.
    pub header: Option<String>,
}

impl Default for TypeScriptOptions {
    fn default() -> Self {
        Self {
            export: true,
            readonly: false,
            optional: OptionalStyle::Declared,
            unknown: UnknownStyle::Unknown,
            type_imports: true,
            extension: "ts".to_string(),
            index_file: "index.ts".to_string(),
            header: Some("Auto-generated. Do not edit manually.".to_string()),
        }
    }
}

impl TypeScriptOptions {
    /// Options without a banner, convenient for comparing emitted text.
    pub fn bare() -> Self {
        Self {
            header: None,
            ..Self::default()
        }
    }

    pub(crate) fn write_header(&self, out: &mut String) {
        if let Some(header) = &self.header {
            for line in header.lines() {
                if line.is_empty() {
                    out.push_str("//\n");
                } else {
                    out.push_str("// ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            out.push('\n');
        }
    }
}

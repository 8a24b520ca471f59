//! The aggregate index (barrel) file.

use crate::descriptor::SchemaDescriptor;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::options::TypeScriptOptions;
use crate::paths::index_specifier;
use std::collections::BTreeMap;

/// Render the index file re-exporting every schema.
///
/// Lines are sorted by module path, then name. A name declared under more than
/// one module path would make `export *` ambiguous, so every schema sharing it
/// is left out of the index and reported instead.
pub fn emit_index(
    schemas: &[SchemaDescriptor],
    options: &TypeScriptOptions,
) -> (String, Vec<Diagnostic>) {
    let mut by_name: BTreeMap<&str, Vec<&SchemaDescriptor>> = BTreeMap::new();
    for schema in schemas {
        by_name.entry(schema.name.as_str()).or_default().push(schema);
    }

    let mut diagnostics = Vec::new();
    let mut exported: Vec<&SchemaDescriptor> = Vec::with_capacity(schemas.len());
    for (name, group) in by_name {
        if let [only] = group.as_slice() {
            exported.push(only);
            continue;
        }
        let mut module_paths: Vec<String> = group
            .iter()
            .map(|s| {
                if s.module_path.is_empty() {
                    "<root>".to_string()
                } else {
                    s.display_path()
                }
            })
            .collect();
        module_paths.sort();
        tracing::warn!(name, ?module_paths, "ambiguous export left out of index");
        diagnostics.push(Diagnostic::new(
            "",
            name,
            None,
            DiagnosticKind::AmbiguousExport {
                name: name.to_string(),
                module_paths,
            },
        ));
    }
    exported.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let mut out = String::new();
    options.write_header(&mut out);
    for schema in exported {
        out.push_str(&format!(
            "export * from '{}';\n",
            index_specifier(&options.index_file, &schema.module_path, &schema.name)
        ));
    }
    (out, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(name: &str, path: &[&str]) -> SchemaDescriptor {
        SchemaDescriptor::new(name, path, vec![])
    }

    #[test]
    fn sorted_by_module_then_name() {
        let schemas = [
            schema("User", &["blog"]),
            schema("Post", &["blog"]),
            schema("Account", &["accounts"]),
            schema("Root", &[]),
        ];
        let (text, diagnostics) = emit_index(&schemas, &TypeScriptOptions::bare());
        assert!(diagnostics.is_empty());
        assert_eq!(
            text,
            "export * from './Root';\n\
             export * from './accounts/Account';\n\
             export * from './blog/Post';\n\
             export * from './blog/User';\n"
        );
    }

    #[test]
    fn ambiguous_names_are_reported_not_picked() {
        let schemas = [
            schema("Item", &["catalog"]),
            schema("Item", &["orders"]),
            schema("Order", &["orders"]),
        ];
        let (text, diagnostics) = emit_index(&schemas, &TypeScriptOptions::bare());
        assert_eq!(text, "export * from './orders/Order';\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::AmbiguousExport {
                name: "Item".into(),
                module_paths: vec!["catalog".into(), "orders".into()],
            }
        );
    }

    #[test]
    fn header_and_nested_index_location() {
        let options = TypeScriptOptions {
            index_file: "types/index.ts".into(),
            ..TypeScriptOptions::default()
        };
        let (text, _) = emit_index(&[schema("Post", &["blog"])], &options);
        assert_eq!(
            text,
            "// Auto-generated. Do not edit manually.\n\nexport * from '../blog/Post';\n"
        );
    }
}

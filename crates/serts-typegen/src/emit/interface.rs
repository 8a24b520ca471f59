//! Per-schema interface files.

use super::{is_identifier, write_docs};
use crate::descriptor::SchemaDescriptor;
use crate::graph::ImportRequirement;
use crate::mapper::{map_degraded, map_field};
use crate::options::{OptionalStyle, TypeScriptOptions};
use std::collections::HashSet;

/// Render one schema as a TypeScript interface file.
///
/// `imports` must already be deduplicated and sorted (as produced by
/// [`SchemaGraph`](crate::graph::SchemaGraph)); `degraded` holds the indices
/// of fields whose references did not resolve.
pub fn emit_interface(
    schema: &SchemaDescriptor,
    imports: &[ImportRequirement],
    degraded: &HashSet<usize>,
    options: &TypeScriptOptions,
) -> String {
    let mut out = String::new();
    options.write_header(&mut out);

    let import_kw = if options.type_imports {
        "import type"
    } else {
        "import"
    };
    for import in imports {
        out.push_str(&format!(
            "{import_kw} {{ {} }} from '{}';\n",
            import.name, import.specifier
        ));
    }
    if !imports.is_empty() {
        out.push('\n');
    }

    if let Some(docs) = &schema.docs {
        write_docs(&mut out, docs, "");
    }
    let export = if options.export { "export " } else { "" };
    out.push_str(&format!("{export}interface {} {{\n", schema.name));

    for (i, field) in schema.fields.iter().enumerate() {
        if let Some(docs) = &field.docs {
            write_docs(&mut out, docs, "  ");
        }
        let ty = if degraded.contains(&i) {
            map_degraded(field, options.unknown)
        } else {
            map_field(field, options.unknown)
        };
        let readonly = if options.readonly { "readonly " } else { "" };
        let optional = match options.optional {
            OptionalStyle::Always => "?",
            OptionalStyle::Declared if field.optional => "?",
            OptionalStyle::Declared => "",
        };
        out.push_str(&format!(
            "  {readonly}{}{optional}: {ty};\n",
            property_key(&field.name)
        ));
    }

    out.push_str("}\n");
    out
}

fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        crate::ir::Type::StringLiteral(name.to_string()).to_string()
    }
}

//! TypeScript emitters.
//!
//! [`interface`] renders one schema per file; [`index`] renders the barrel file
//! that re-exports every generated interface.

pub mod index;
pub mod interface;

pub use index::emit_index;
pub use interface::emit_interface;

/// Whether `name` can be written as a bare TypeScript identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// Keywords that cannot name an interface, the predefined type names, and the
// utility type used for mapping fields.
const RESERVED_NAMES: &[&str] = &[
    "any", "bigint", "boolean", "break", "case", "catch", "class", "const", "continue",
    "debugger", "default", "delete", "do", "else", "enum", "export", "extends", "false",
    "finally", "for", "function", "if", "implements", "import", "in", "instanceof",
    "interface", "let", "never", "new", "null", "number", "object", "package", "private",
    "protected", "public", "Record", "return", "static", "string", "super", "switch",
    "symbol", "this", "throw", "true", "try", "typeof", "undefined", "unknown", "var",
    "void", "while", "with", "yield",
];

/// Whether `name` is an identifier that still cannot be an interface name.
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

// JSDoc block at the given indentation.
pub(crate) fn write_docs(out: &mut String, docs: &str, indent: &str) {
    let docs = docs.trim().replace("*/", "*\\/");
    if docs.is_empty() {
        return;
    }
    let lines: Vec<&str> = docs.lines().map(str::trim_end).collect();
    if let [line] = lines.as_slice() {
        out.push_str(&format!("{indent}/** {line} */\n"));
        return;
    }
    out.push_str(&format!("{indent}/**\n"));
    for line in lines {
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
}

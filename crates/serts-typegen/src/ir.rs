//! Type expressions for generated TypeScript.
//!
//! The mapper produces a [`Type`]; its `Display` impl is the only place that
//! turns a type into TypeScript syntax, so the emitters never re-derive it.

use serde::Serialize;
use std::fmt;

/// A TypeScript type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Type {
    String,
    Number,
    Boolean,
    Null,

    /// `T[]`
    Array(Box<Type>),
    /// `Record<string, T>`
    Record(Box<Type>),

    /// Reference to a generated interface.
    Ref(String),

    /// `A | B | ...`, rendered in order.
    Union(Vec<Type>),

    StringLiteral(String),

    /// Fallback for anything that cannot be mapped.
    Unknown(UnknownStyle),
}

/// How the fallback type is spelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownStyle {
    /// `unknown`: callers must narrow before use.
    #[default]
    Unknown,
    /// `any`, matching hand-written code that predates `unknown`.
    Any,
}

impl Type {
    pub fn array(item: Type) -> Self {
        Type::Array(Box::new(item))
    }

    /// Add a `null` variant, flattening into an existing union.
    pub fn or_null(self) -> Self {
        match self {
            Type::Null => Type::Null,
            Type::Union(mut arms) => {
                if !arms.contains(&Type::Null) {
                    arms.push(Type::Null);
                }
                Type::Union(arms)
            }
            other => Type::Union(vec![other, Type::Null]),
        }
    }

    fn needs_parens_in_array(&self) -> bool {
        matches!(self, Type::Union(arms) if arms.len() > 1)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::String => f.write_str("string"),
            Type::Number => f.write_str("number"),
            Type::Boolean => f.write_str("boolean"),
            Type::Null => f.write_str("null"),
            Type::Array(item) if item.needs_parens_in_array() => write!(f, "({item})[]"),
            Type::Array(item) => write!(f, "{item}[]"),
            Type::Record(value) => write!(f, "Record<string, {value}>"),
            Type::Ref(name) => f.write_str(name),
            Type::Union(arms) => {
                for (i, arm) in arms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{arm}")?;
                }
                Ok(())
            }
            Type::StringLiteral(value) => write_quoted(f, value),
            Type::Unknown(UnknownStyle::Unknown) => f.write_str("unknown"),
            Type::Unknown(UnknownStyle::Any) => f.write_str("any"),
        }
    }
}

// Double-quoted TypeScript string literal.
fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

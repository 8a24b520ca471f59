//! Schema and field descriptors.
//!
//! Descriptors are the engine's only input. They are produced by an external
//! introspection step (one per serializer class) and delivered either as Rust
//! values or as a serde document:
//!
//! ```json
//! { "schemas": [
//!     { "name": "Post", "module_path": ["blog"], "fields": [
//!         { "name": "id", "kind": "primitive", "primitive": "integer" },
//!         { "name": "author", "kind": "nested", "schema": "User", "nullable": true }
//!     ] }
//! ] }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A document holding every schema of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorDocument {
    pub schemas: Vec<SchemaDescriptor>,
}

/// One translatable record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Type name and output file base name.
    pub name: String,
    /// Logical grouping, mirrored as output directories.
    #[serde(default)]
    pub module_path: Vec<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

/// One declared field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawField", into = "RawField")]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// The value may be null at runtime.
    pub nullable: bool,
    /// The property may be absent.
    pub optional: bool,
    pub docs: Option<String>,
}

/// The shape of a field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Primitive(PrimitiveType),
    /// Ordered literal values.
    Choice(Vec<String>),
    /// Another schema, by name. May name the owning schema.
    Nested(String),
    NestedList(String),
    PrimitiveList(PrimitiveType),
    /// String-keyed dictionary. `None` means the value type is not declared.
    Mapping(Option<PrimitiveType>),
    /// A field the extractor could not classify, with its raw class name if known.
    Unknown(Option<String>),
}

/// Scalar field types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Integer,
    Float,
    Decimal,
    Text,
    Identifier,
    Boolean,
    Date,
    Time,
    Datetime,
    Binary,
    Json,
    /// A primitive name missing from the mapping table.
    Unrecognized(String),
}

impl PrimitiveType {
    pub fn as_str(&self) -> &str {
        match self {
            PrimitiveType::Integer => "integer",
            PrimitiveType::Float => "float",
            PrimitiveType::Decimal => "decimal",
            PrimitiveType::Text => "text",
            PrimitiveType::Identifier => "identifier",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Date => "date",
            PrimitiveType::Time => "time",
            PrimitiveType::Datetime => "datetime",
            PrimitiveType::Binary => "binary",
            PrimitiveType::Json => "json",
            PrimitiveType::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for PrimitiveType {
    fn from(name: &str) -> Self {
        match name {
            "integer" => PrimitiveType::Integer,
            "float" => PrimitiveType::Float,
            "decimal" => PrimitiveType::Decimal,
            "text" => PrimitiveType::Text,
            "identifier" => PrimitiveType::Identifier,
            "boolean" => PrimitiveType::Boolean,
            "date" => PrimitiveType::Date,
            "time" => PrimitiveType::Time,
            "datetime" => PrimitiveType::Datetime,
            "binary" => PrimitiveType::Binary,
            "json" => PrimitiveType::Json,
            other => PrimitiveType::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FieldKind {
    /// The schema this field references, if any.
    pub fn referenced_schema(&self) -> Option<&str> {
        match self {
            FieldKind::Nested(name) | FieldKind::NestedList(name) => Some(name),
            _ => None,
        }
    }
}

impl SchemaDescriptor {
    pub fn new(name: impl Into<String>, module_path: &[&str], fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            module_path: module_path.iter().map(|s| s.to_string()).collect(),
            fields,
            docs: None,
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    /// Module path joined with `/`, for messages. Empty for the root.
    pub fn display_path(&self) -> String {
        self.module_path.join("/")
    }

    /// Deterministic ordering key: module path, then name.
    pub fn sort_key(&self) -> (&[String], &str) {
        (&self.module_path, &self.name)
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            optional: false,
            docs: None,
        }
    }

    pub fn primitive(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self::new(name, FieldKind::Primitive(ty))
    }

    pub fn choice(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(
            name,
            FieldKind::Choice(values.iter().map(|v| v.to_string()).collect()),
        )
    }

    pub fn nested(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Nested(schema.into()))
    }

    pub fn nested_list(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self::new(name, FieldKind::NestedList(schema.into()))
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

/// Strip `suffix` from every schema name and every reference to it.
///
/// Serializer classes are conventionally named `UserSerializer`; the generated
/// interface should be `User`. A name equal to the suffix is left alone.
pub fn strip_name_suffix(schemas: &mut [SchemaDescriptor], suffix: &str) {
    if suffix.is_empty() {
        return;
    }
    let strip = |name: &mut String| {
        if name.len() > suffix.len() && name.ends_with(suffix) {
            name.truncate(name.len() - suffix.len());
        }
    };
    for schema in schemas.iter_mut() {
        strip(&mut schema.name);
        for field in &mut schema.fields {
            if let FieldKind::Nested(target) | FieldKind::NestedList(target) = &mut field.kind {
                strip(target);
            }
        }
    }
}

// Flat wire form of a field. Payload keys are checked against `kind` on conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawField {
    name: String,
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primitive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field_class: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    nullable: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    docs: Option<String>,
}

/// A field document whose payload does not match its kind.
#[derive(Debug, thiserror::Error)]
#[error("field `{field}` of kind `{kind}` requires `{key}`")]
pub struct MissingPayload {
    field: String,
    kind: String,
    key: &'static str,
}

impl TryFrom<RawField> for FieldDescriptor {
    type Error = MissingPayload;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let missing = |key| MissingPayload {
            field: raw.name.clone(),
            kind: raw.kind.clone(),
            key,
        };
        let kind = match raw.kind.as_str() {
            "primitive" => FieldKind::Primitive(
                raw.primitive.as_deref().ok_or_else(|| missing("primitive"))?.into(),
            ),
            "primitive_list" => FieldKind::PrimitiveList(
                raw.primitive.as_deref().ok_or_else(|| missing("primitive"))?.into(),
            ),
            "choice" => FieldKind::Choice(raw.choices.clone().ok_or_else(|| missing("choices"))?),
            "nested" => FieldKind::Nested(raw.schema.clone().ok_or_else(|| missing("schema"))?),
            "nested_list" => {
                FieldKind::NestedList(raw.schema.clone().ok_or_else(|| missing("schema"))?)
            }
            "mapping" => FieldKind::Mapping(raw.value.as_deref().map(PrimitiveType::from)),
            "unknown" => FieldKind::Unknown(raw.field_class.clone()),
            other => FieldKind::Unknown(Some(raw.field_class.clone().unwrap_or_else(|| other.to_string()))),
        };
        Ok(FieldDescriptor {
            name: raw.name,
            kind,
            nullable: raw.nullable,
            optional: raw.optional,
            docs: raw.docs,
        })
    }
}

impl From<FieldDescriptor> for RawField {
    fn from(field: FieldDescriptor) -> Self {
        let mut raw = RawField {
            name: field.name,
            nullable: field.nullable,
            optional: field.optional,
            docs: field.docs,
            ..Default::default()
        };
        raw.kind = match field.kind {
            FieldKind::Primitive(ty) => {
                raw.primitive = Some(ty.as_str().to_string());
                "primitive"
            }
            FieldKind::PrimitiveList(ty) => {
                raw.primitive = Some(ty.as_str().to_string());
                "primitive_list"
            }
            FieldKind::Choice(values) => {
                raw.choices = Some(values);
                "choice"
            }
            FieldKind::Nested(schema) => {
                raw.schema = Some(schema);
                "nested"
            }
            FieldKind::NestedList(schema) => {
                raw.schema = Some(schema);
                "nested_list"
            }
            FieldKind::Mapping(value) => {
                raw.value = value.map(|v| v.as_str().to_string());
                "mapping"
            }
            FieldKind::Unknown(class) => {
                raw.field_class = class;
                "unknown"
            }
        }
        .to_string();
        raw
    }
}

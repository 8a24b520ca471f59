//! Field type mapping.
//!
//! Total over [`FieldKind`]: every field maps to some [`Type`], falling back to
//! the unknown type instead of failing.

use crate::descriptor::{FieldDescriptor, FieldKind, PrimitiveType};
use crate::ir::{Type, UnknownStyle};

/// Map a field to its TypeScript type, including the `null` variant.
///
/// A self-reference names the owning interface, which is in scope in its own
/// file, so references map the same way whether or not they point home.
pub fn map_field(field: &FieldDescriptor, unknown: UnknownStyle) -> Type {
    let base = match &field.kind {
        FieldKind::Primitive(ty) => map_primitive(ty, unknown),
        FieldKind::Choice(values) => map_choice(values),
        FieldKind::Nested(target) => Type::Ref(target.clone()),
        FieldKind::NestedList(target) => Type::array(Type::Ref(target.clone())),
        FieldKind::PrimitiveList(ty) => Type::array(map_primitive(ty, unknown)),
        FieldKind::Mapping(value) => Type::Record(Box::new(
            value
                .as_ref()
                .map(|ty| map_primitive(ty, unknown))
                .unwrap_or(Type::Unknown(unknown)),
        )),
        FieldKind::Unknown(_) => Type::Unknown(unknown),
    };
    with_nullability(base, field)
}

/// The degraded type of a field whose reference could not be resolved.
pub fn map_degraded(field: &FieldDescriptor, unknown: UnknownStyle) -> Type {
    let base = match field.kind {
        FieldKind::NestedList(_) => Type::array(Type::Unknown(unknown)),
        _ => Type::Unknown(unknown),
    };
    with_nullability(base, field)
}

/// Why a field maps to the unknown type, if it does.
pub fn unmappable(field: &FieldDescriptor) -> Option<String> {
    match &field.kind {
        FieldKind::Unknown(Some(class)) => Some(format!("unsupported field class `{class}`")),
        FieldKind::Unknown(None) => Some("field kind not declared".to_string()),
        FieldKind::Primitive(PrimitiveType::Unrecognized(name))
        | FieldKind::PrimitiveList(PrimitiveType::Unrecognized(name))
        | FieldKind::Mapping(Some(PrimitiveType::Unrecognized(name))) => {
            Some(format!("unrecognized primitive type `{name}`"))
        }
        _ => None,
    }
}

pub fn map_primitive(ty: &PrimitiveType, unknown: UnknownStyle) -> Type {
    match ty {
        PrimitiveType::Integer | PrimitiveType::Float | PrimitiveType::Decimal => Type::Number,
        // Temporal and binary values travel as ISO-8601 or encoded text.
        PrimitiveType::Text
        | PrimitiveType::Identifier
        | PrimitiveType::Date
        | PrimitiveType::Time
        | PrimitiveType::Datetime
        | PrimitiveType::Binary => Type::String,
        PrimitiveType::Boolean => Type::Boolean,
        PrimitiveType::Json | PrimitiveType::Unrecognized(_) => Type::Unknown(unknown),
    }
}

fn map_choice(values: &[String]) -> Type {
    match values {
        [] => Type::String,
        [only] => Type::StringLiteral(only.clone()),
        _ => Type::Union(values.iter().cloned().map(Type::StringLiteral).collect()),
    }
}

fn with_nullability(base: Type, field: &FieldDescriptor) -> Type {
    if field.nullable { base.or_null() } else { base }
}

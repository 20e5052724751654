//! DTO projection: flattens a built [`Value`] tree into a plain, schema-named
//! record. [`Dto::Struct`] carries the composite's type name alongside an
//! [`IndexMap`] keyed by sanitised field name (dashes and dots replaced with
//! underscores), so a caller can pattern-match on shape and field name
//! without touching the `Meta`/`Registry` layer that produced the value.

use indexmap::IndexMap;

use crate::value::{Scalar, Value, ValueKind};

/// A value tree with every schema/descriptor bookkeeping stripped away,
/// suitable for handing to code that only cares about shape and field
/// names, not the `Meta`/`Registry` layer that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Dto {
    /// The absent-value sentinel: an AMQP `null`, or a composite field that
    /// was never set.
    Null,
    /// A primitive leaf, including the primitive a [`crate::value::RestrictedValue`]
    /// ultimately unwraps to.
    Scalar(Scalar),
    /// An ordered sequence: a `list` or an `array`.
    Seq(Vec<Dto>),
    /// An ordered sequence of key/value pairs: a `map`.
    Map(Vec<(Dto, Dto)>),
    /// A composite, projected as its schema type name plus a field-name-keyed
    /// record.
    Struct(String, IndexMap<String, Dto>),
}

/// Projects `value` into its [`Dto`] shape.
///
/// - `Composite` becomes [`Dto::Struct`], keyed by [`sanitise_field_name`].
/// - `Restricted` unwraps straight through to its underlying primitive —
///   the restriction is a schema-time concept, not a shape the DTO layer
///   preserves.
/// - `List`/`Array` become [`Dto::Seq`]; `Map` becomes [`Dto::Map`].
/// - `Null` becomes [`Dto::Null`].
pub fn as_dto(value: &Value) -> Dto {
    match value.kind() {
        ValueKind::Null => Dto::Null,
        ValueKind::Scalar(scalar) => Dto::Scalar(scalar.clone()),
        ValueKind::List(items) => Dto::Seq(items.iter().map(as_dto).collect()),
        ValueKind::Array(array) => Dto::Seq(array.members().iter().map(as_dto).collect()),
        ValueKind::Map(entries) => Dto::Map(
            entries
                .iter()
                .map(|(k, v)| (as_dto(k), as_dto(v)))
                .collect(),
        ),
        ValueKind::Composite(composite) => {
            let mut fields = IndexMap::with_capacity(composite.fields().len());
            for (field, field_value) in composite.meta().fields().iter().zip(composite.fields()) {
                fields.insert(sanitise_field_name(field.name()), as_dto(field_value));
            }
            Dto::Struct(composite.meta().type_name().to_string(), fields)
        }
        ValueKind::Restricted(restricted) => as_dto(restricted.inner()),
    }
}

/// Replaces `-` and `.` with `_` so a schema field name (e.g.
/// `"snd-settle-mode"`, `"amqp.annotation.x-opt"`) becomes a valid Rust-ish
/// identifier for DTO lookup.
pub fn sanitise_field_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '-' || c == '.' { '_' } else { c })
        .collect()
}

impl Dto {
    /// Borrows this DTO as a scalar, if it is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Dto::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Borrows this DTO as a struct's `(type_name, fields)`, if it is one.
    pub fn as_struct(&self) -> Option<(&str, &IndexMap<String, Dto>)> {
        match self {
            Dto::Struct(type_name, fields) => Some((type_name.as_str(), fields)),
            _ => None,
        }
    }

    /// Whether this DTO is the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Dto::Null)
    }
}

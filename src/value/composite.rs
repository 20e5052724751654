//! Composite (named, field-structured) values.

use std::sync::Arc;

use crate::meta::Meta;

use super::Value;

/// A composite value: one slot per schema-declared field, in declaration
/// order. Absent optional fields are present as `Value::NULL`, never
/// missing — a composite's field count always equals its `Meta`'s declared
/// field count.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
    meta: Arc<Meta>,
    fields: Vec<Value>,
}

impl CompositeValue {
    /// Builds a composite from a `Meta` and its already-cleaned, ordered
    /// field values. Callers should go through
    /// [`Meta::create`](crate::meta::Meta::create) rather than call this
    /// directly, since it performs no validation.
    pub fn new(meta: Arc<Meta>, fields: Vec<Value>) -> Self {
        debug_assert_eq!(fields.len(), meta.fields().len());
        CompositeValue { meta, fields }
    }

    /// This composite's schema record.
    pub fn meta(&self) -> &Arc<Meta> {
        &self.meta
    }

    /// All field values, in schema declaration order.
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Looks up a field's value by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let index = self.meta.fields().iter().position(|f| f.name() == name)?;
        self.fields.get(index)
    }

    /// The fields to actually emit when encoding: trailing `Null` fields
    /// after the last non-null field are elided, since the schema decoder
    /// re-expands any missing tail fields back to `Null` on the way in.
    pub fn encoded_fields(&self) -> &[Value] {
        let last_non_null = self.fields.iter().rposition(|f| !f.is_null());
        match last_non_null {
            Some(index) => &self.fields[..=index],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use crate::meta::{Field, Meta, TypeClass};

    fn list_meta(name: &str, field_names: &[&str]) -> Arc<Meta> {
        let fields = field_names
            .iter()
            .map(|n| Field::new(n.to_string(), "ubyte".to_string(), false, false, Vec::new()))
            .collect();
        Arc::new(Meta::composite(
            name.to_string(),
            Some(Descriptor::Symbolic(crate::primitives::Symbol::from(name))),
            None,
            fields,
            Vec::new(),
        ))
    }

    #[test]
    fn encoded_fields_elides_trailing_nulls() {
        let meta = list_meta("test:list", &["a", "b", "c"]);
        let composite = CompositeValue::new(
            meta,
            vec![Value::scalar(1u8), Value::NULL, Value::NULL],
        );
        assert_eq!(composite.encoded_fields().len(), 1);
    }

    #[test]
    fn encoded_fields_keeps_interior_nulls() {
        let meta = list_meta("test:list", &["a", "b", "c"]);
        let composite = CompositeValue::new(
            meta,
            vec![Value::scalar(1u8), Value::NULL, Value::scalar(3u8)],
        );
        assert_eq!(composite.encoded_fields().len(), 3);
    }

    #[test]
    fn field_looks_up_by_name() {
        let meta = list_meta("test:list", &["a", "b"]);
        let composite = CompositeValue::new(meta, vec![Value::scalar(1u8), Value::scalar(2u8)]);
        assert_eq!(composite.field("b"), Some(&Value::scalar(2u8)));
        assert_eq!(composite.field("missing"), None);
    }

    #[test]
    fn meta_type_class_is_composite() {
        let meta = list_meta("test:list", &["a"]);
        assert_eq!(meta.type_class(), TypeClass::Composite);
    }
}

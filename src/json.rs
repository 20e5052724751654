//! `serde_json::Value` bridge, enabled by the `json` feature.
//!
//! Grounded on `serde_amqp::value::mod.rs`'s `From<serde_json::Value> for
//! Value` impl: JSON numbers become `Long`/`ULong`/`Double` depending on
//! which fits, JSON arrays become an untyped [`crate::value::ValueKind::List`]
//! (never an [`crate::value::ArrayValue`] — JSON gives no guarantee of
//! element-type homogeneity, so the monomorphic-array invariant can't be
//! assumed), and JSON objects become a [`crate::value::ValueKind::Map`]
//! keyed by string.

use crate::value::{Value, ValueKind};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::NULL,
            serde_json::Value::Bool(b) => Value::scalar(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::scalar(i)
                } else if let Some(u) = n.as_u64() {
                    Value::scalar(u)
                } else {
                    Value::scalar(n.as_f64().expect("serde_json guarantees this is f64-representable"))
                }
            }
            serde_json::Value::String(s) => Value::scalar(s),
            serde_json::Value::Array(items) => {
                Value::new(ValueKind::List(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(map) => Value::new(ValueKind::Map(
                map.into_iter()
                    .map(|(key, value)| (Value::scalar(key), Value::from(value)))
                    .collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;
    use serde_json::json;

    #[test]
    fn null_converts_to_null_value() {
        let value = Value::from(json!(null));
        assert!(value.is_null());
    }

    #[test]
    fn integer_prefers_signed_representation() {
        let value = Value::from(json!(-7));
        assert_eq!(value.as_scalar(), Some(&Scalar::Long(-7)));
    }

    #[test]
    fn large_unsigned_falls_back_to_ulong() {
        let value = Value::from(json!(18_446_744_073_709_551_615u64));
        assert_eq!(value.as_scalar(), Some(&Scalar::ULong(u64::MAX)));
    }

    #[test]
    fn array_becomes_untyped_list() {
        let value = Value::from(json!([1, "two", true]));
        match value.kind() {
            ValueKind::List(items) => assert_eq!(items.len(), 3),
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[test]
    fn object_becomes_string_keyed_map() {
        let value = Value::from(json!({"a": 1, "b": 2}));
        match value.kind() {
            ValueKind::Map(entries) => assert_eq!(entries.len(), 2),
            other => panic!("expected a map, got {other:?}"),
        }
    }
}

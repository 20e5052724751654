//! Restricted (named scalar) values.

use std::sync::Arc;

use crate::meta::Meta;

use super::{Value, ValueKind};

/// A restricted value: a named scalar type layered on top of a primitive or
/// another restricted type, optionally limited to an enumerated set of
/// `choices`.
#[derive(Debug, Clone, PartialEq)]
pub struct RestrictedValue {
    meta: Arc<Meta>,
    inner: Box<Value>,
}

impl RestrictedValue {
    /// Wraps `inner` (which must itself be a `Scalar` or another
    /// `Restricted` value — never a collection or composite) under `meta`.
    pub fn new(meta: Arc<Meta>, inner: Value) -> Self {
        debug_assert!(matches!(
            inner.kind(),
            ValueKind::Scalar(_) | ValueKind::Restricted(_)
        ));
        RestrictedValue {
            meta,
            inner: Box::new(inner),
        }
    }

    /// This restricted value's schema record.
    pub fn meta(&self) -> &Arc<Meta> {
        &self.meta
    }

    /// The wrapped value.
    pub fn inner(&self) -> &Value {
        &self.inner
    }

    /// Unwraps all the way down to the bottom-most scalar, following
    /// through any nested `Restricted` layers.
    pub fn scalar(&self) -> &super::Scalar {
        let mut current = self.inner.as_ref();
        loop {
            match current.kind() {
                ValueKind::Scalar(scalar) => return scalar,
                ValueKind::Restricted(restricted) => current = restricted.inner(),
                _ => unreachable!("RestrictedValue can only wrap Scalar or Restricted"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use crate::meta::Meta;
    use crate::primitives::Symbol;
    use indexmap::IndexMap;

    fn restricted_meta(name: &str, source: &str) -> Arc<Meta> {
        Arc::new(Meta::restricted(
            name.to_string(),
            source.to_string(),
            Some(Descriptor::Symbolic(Symbol::from(name))),
            None,
            IndexMap::new(),
        ))
    }

    #[test]
    fn scalar_unwraps_through_nesting() {
        let inner_meta = restricted_meta("test:inner", "ubyte");
        let inner = Value::new(ValueKind::Restricted(RestrictedValue::new(
            inner_meta,
            Value::scalar(7u8),
        )));
        let outer_meta = restricted_meta("test:outer", "test:inner");
        let outer = RestrictedValue::new(outer_meta, inner);

        assert_eq!(outer.scalar(), &crate::value::Scalar::UByte(7));
    }
}

//! Monomorphic arrays.

use crate::descriptor::Descriptor;
use crate::error::Error;

use super::{Value, ValueKind};

/// Identifies a value's "source type" for the purposes of the monomorphic
/// array check: two scalars of the same primitive, or two composites/
/// restricted values of the same schema type and descriptor, are
/// considered the same member type even though the encoder may ultimately
/// choose different short/long format-code variants for each.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MemberSignature {
    Null,
    Scalar(&'static str),
    List,
    Map,
    Array,
    Composite(String),
    Restricted(String),
}

impl MemberSignature {
    fn of(value: &Value) -> (MemberSignature, Option<Descriptor>) {
        let signature = match value.kind() {
            ValueKind::Null => MemberSignature::Null,
            ValueKind::Scalar(scalar) => MemberSignature::Scalar(scalar.primitive_name()),
            ValueKind::List(_) => MemberSignature::List,
            ValueKind::Map(_) => MemberSignature::Map,
            ValueKind::Array(_) => MemberSignature::Array,
            ValueKind::Composite(c) => MemberSignature::Composite(c.meta().type_name().to_string()),
            ValueKind::Restricted(r) => {
                MemberSignature::Restricted(r.meta().type_name().to_string())
            }
        };
        (signature, value.descriptor().cloned())
    }
}

/// An array: a sequence of values that must all share one member type.
///
/// The member type may be declared up front by the caller, or inferred from
/// the first member pushed (a fallback for callers building an array
/// incrementally without knowing the element type ahead of time).
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    signature: Option<(MemberSignature, Option<Descriptor>)>,
    members: Vec<Value>,
}

impl ArrayValue {
    /// An empty array with no declared member type; the type is inferred
    /// from the first pushed member.
    pub fn new() -> Self {
        ArrayValue {
            signature: None,
            members: Vec::new(),
        }
    }

    /// An empty array whose member type is fixed to that of `exemplar`, so
    /// that a caller can declare the intended element type before any
    /// members exist (e.g. to represent a caller-declared-but-empty array).
    pub fn with_member_type(exemplar: &Value) -> Self {
        ArrayValue {
            signature: Some(MemberSignature::of(exemplar)),
            members: Vec::new(),
        }
    }

    /// Appends `value`, failing with a type error if it does not match the
    /// array's member type (the first successfully pushed value establishes
    /// the type when none was declared up front).
    pub fn push(&mut self, value: Value) -> Result<(), Error> {
        let candidate = MemberSignature::of(&value);
        match &self.signature {
            None => self.signature = Some(candidate),
            Some(existing) if existing == &candidate => {}
            Some(_) => {
                return Err(Error::type_error(
                    "array member type does not match existing elements",
                ))
            }
        }
        self.members.push(value.as_array_member(true));
        Ok(())
    }

    /// Builds an array from an iterator of values, failing at the first
    /// element that breaks monomorphism.
    pub fn try_from_iter(values: impl IntoIterator<Item = Value>) -> Result<Self, Error> {
        let mut array = ArrayValue::new();
        for value in values {
            array.push(value)?;
        }
        Ok(array)
    }

    /// The array's members, in order.
    pub fn members(&self) -> &[Value] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the array has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Consumes the array, returning its members.
    pub fn into_members(self) -> Vec<Value> {
        self.members
    }
}

impl Default for ArrayValue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Symbol;

    #[test]
    fn push_infers_type_from_first_member() {
        let mut array = ArrayValue::new();
        array.push(Value::scalar(1u32)).unwrap();
        array.push(Value::scalar(2u32)).unwrap();
        assert_eq!(array.len(), 2);
    }

    #[test]
    fn push_rejects_mismatched_type() {
        let mut array = ArrayValue::new();
        array.push(Value::scalar(1u32)).unwrap();
        let err = array.push(Value::scalar(Symbol::from("x")));
        assert!(err.is_err());
    }

    #[test]
    fn members_are_marked_in_array() {
        let mut array = ArrayValue::new();
        array.push(Value::scalar(1u32)).unwrap();
        assert!(array.members()[0].in_array());
    }

    #[test]
    fn try_from_iter_builds_homogeneous_array() {
        let array = ArrayValue::try_from_iter(vec![
            Value::scalar(1u32),
            Value::scalar(2u32),
            Value::scalar(3u32),
        ])
        .unwrap();
        assert_eq!(array.len(), 3);
    }
}

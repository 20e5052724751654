//! The tagged value tree produced by decoding and consumed by encoding.
//!
//! Every value is one of seven kinds (`Null`, `Scalar`, `List`, `Map`,
//! `Array`, `Composite`, `Restricted`); every value optionally carries a
//! [`Descriptor`] and an "in array" flag that tells the encoder to omit the
//! constructor (the array's shared constructor already supplies it).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::meta::Meta;
use crate::primitives::{Binary, Dec128, Dec32, Dec64, Symbol, Timestamp, Uuid};

mod array;
mod composite;
mod restricted;

pub use array::ArrayValue;
pub use composite::CompositeValue;
pub use restricted::RestrictedValue;

/// A scalar primitive payload: the leaves of the value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// `boolean`/`true`/`false`.
    Bool(bool),
    /// `ubyte`.
    UByte(u8),
    /// `ushort`.
    UShort(u16),
    /// `uint`/`smalluint`/`uint0`.
    UInt(u32),
    /// `ulong`/`smallulong`/`ulong0`.
    ULong(u64),
    /// `byte`.
    Byte(i8),
    /// `short`.
    Short(i16),
    /// `int`/`smallint`.
    Int(i32),
    /// `long`/`smalllong`.
    Long(i64),
    /// `float`.
    Float(OrderedFloat<f32>),
    /// `double`.
    Double(OrderedFloat<f64>),
    /// `decimal32`, reserved.
    Decimal32(Dec32),
    /// `decimal64`, reserved.
    Decimal64(Dec64),
    /// `decimal128`, reserved.
    Decimal128(Dec128),
    /// `char` (UTF-32BE pass-through).
    Char(char),
    /// `ms64` / `timestamp`.
    Timestamp(Timestamp),
    /// `uuid`.
    Uuid(Uuid),
    /// `vbin8`/`vbin32`.
    Binary(Binary),
    /// `str8`/`str32`.
    String(String),
    /// `sym8`/`sym32`.
    Symbol(Symbol),
}

impl Scalar {
    /// The primitive type name this scalar decodes as, matching the names
    /// used in schema XML (`ubyte`, `uint`, `string`, ...).
    pub fn primitive_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::UByte(_) => "ubyte",
            Scalar::UShort(_) => "ushort",
            Scalar::UInt(_) => "uint",
            Scalar::ULong(_) => "ulong",
            Scalar::Byte(_) => "byte",
            Scalar::Short(_) => "short",
            Scalar::Int(_) => "int",
            Scalar::Long(_) => "long",
            Scalar::Float(_) => "float",
            Scalar::Double(_) => "double",
            Scalar::Decimal32(_) => "decimal32",
            Scalar::Decimal64(_) => "decimal64",
            Scalar::Decimal128(_) => "decimal128",
            Scalar::Char(_) => "char",
            Scalar::Timestamp(_) => "timestamp",
            Scalar::Uuid(_) => "uuid",
            Scalar::Binary(_) => "binary",
            Scalar::String(_) => "string",
            Scalar::Symbol(_) => "symbol",
        }
    }
}

macro_rules! impl_from_for_scalar {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Scalar {
            fn from(val: $ty) -> Self {
                Scalar::$variant(val)
            }
        }
    };
}

impl_from_for_scalar!(Bool, bool);
impl_from_for_scalar!(UByte, u8);
impl_from_for_scalar!(UShort, u16);
impl_from_for_scalar!(UInt, u32);
impl_from_for_scalar!(ULong, u64);
impl_from_for_scalar!(Byte, i8);
impl_from_for_scalar!(Short, i16);
impl_from_for_scalar!(Int, i32);
impl_from_for_scalar!(Long, i64);
impl_from_for_scalar!(Char, char);
impl_from_for_scalar!(Timestamp, Timestamp);
impl_from_for_scalar!(Uuid, Uuid);
impl_from_for_scalar!(Binary, Binary);
impl_from_for_scalar!(String, String);
impl_from_for_scalar!(Symbol, Symbol);

impl From<f32> for Scalar {
    fn from(val: f32) -> Self {
        Scalar::Float(OrderedFloat(val))
    }
}

impl From<f64> for Scalar {
    fn from(val: f64) -> Self {
        Scalar::Double(OrderedFloat(val))
    }
}

impl From<&str> for Scalar {
    fn from(val: &str) -> Self {
        Scalar::String(val.to_string())
    }
}

/// A key/value pair within a [`ValueKind::Map`], kept as a pair rather than
/// a hash map because AMQP maps are ordered and may contain non-hashable
/// (e.g. list-valued) keys.
pub type MapEntry = (Value, Value);

/// The shape of a [`Value`], before its descriptor/array-membership wrapper
/// is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// The empty value. Scalar-empty; never used for a Composite (absent
    /// composite fields are instead `Scalar`-typed Null field slots, i.e.
    /// this same variant used as a field value, which is distinct from an
    /// empty composite — composites are never themselves empty).
    Null,
    /// A primitive leaf.
    Scalar(Scalar),
    /// An ordered, polymorphic sequence.
    List(Vec<Value>),
    /// An ordered sequence of key/value pairs.
    Map(Vec<MapEntry>),
    /// A monomorphic sequence sharing one member constructor.
    Array(ArrayValue),
    /// A named, field-structured type.
    Composite(CompositeValue),
    /// A named scalar type, optionally restricted to an enumerated set of
    /// choices.
    Restricted(RestrictedValue),
}

/// A node of the value tree: a [`ValueKind`] plus the two cross-cutting
/// properties every value carries — its descriptor and whether it is
/// currently positioned as a member of an array (in which case the encoder
/// omits its constructor).
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    kind: ValueKind,
    descriptor: Option<Descriptor>,
    in_array: bool,
}

impl Value {
    /// The canonical null value.
    pub const NULL: Value = Value {
        kind: ValueKind::Null,
        descriptor: None,
        in_array: false,
    };

    /// Wraps a [`ValueKind`] with no descriptor, not positioned in an array.
    pub fn new(kind: ValueKind) -> Self {
        Value {
            kind,
            descriptor: None,
            in_array: false,
        }
    }

    /// Wraps a scalar payload.
    pub fn scalar(scalar: impl Into<Scalar>) -> Self {
        Value::new(ValueKind::Scalar(scalar.into()))
    }

    /// Attaches a descriptor to this value, replacing any existing one.
    pub fn with_descriptor(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    /// Marks whether this value is currently a member of an array (i.e.
    /// whether the encoder should omit its own constructor).
    pub fn set_in_array(&mut self, in_array: bool) {
        self.in_array = in_array;
    }

    /// Returns a copy of this value marked (or unmarked) as an array member.
    pub fn as_array_member(mut self, in_array: bool) -> Self {
        self.in_array = in_array;
        self
    }

    /// This value's kind.
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// This value's descriptor, if any.
    pub fn descriptor(&self) -> Option<&Descriptor> {
        self.descriptor.as_ref()
    }

    /// Whether this value is currently positioned as an array member.
    pub fn in_array(&self) -> bool {
        self.in_array
    }

    /// Whether this value is the null value. Per invariant (iv), this is
    /// true only for a scalar `Null`; a `Composite` is never considered
    /// empty, and collections are empty iff their member count is zero —
    /// see [`Value::is_empty`] for the latter.
    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    /// Whether this value is an empty collection (list/map/array with zero
    /// members), or null. Composites are never empty.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            ValueKind::Null => true,
            ValueKind::List(items) => items.is_empty(),
            ValueKind::Map(entries) => entries.is_empty(),
            ValueKind::Array(arr) => arr.is_empty(),
            ValueKind::Scalar(_) | ValueKind::Composite(_) | ValueKind::Restricted(_) => false,
        }
    }

    /// Borrow this value as a scalar, if it is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            ValueKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Borrow this value as a composite, if it is one.
    pub fn as_composite(&self) -> Option<&CompositeValue> {
        match &self.kind {
            ValueKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow this value as a restricted value, if it is one.
    pub fn as_restricted(&self) -> Option<&RestrictedValue> {
        match &self.kind {
            ValueKind::Restricted(r) => Some(r),
            _ => None,
        }
    }

    /// Borrow this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match &self.kind {
            ValueKind::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// The type name under which this value's `Meta` is registered, if it
    /// carries one (composite or restricted values only).
    pub fn meta(&self) -> Option<&Arc<Meta>> {
        match &self.kind {
            ValueKind::Composite(c) => Some(c.meta()),
            ValueKind::Restricted(r) => Some(r.meta()),
            _ => None,
        }
    }

    /// The set of archetype names this value provides, used to satisfy
    /// polymorphic `*` fields. Only composite and restricted values with a
    /// schema `Meta` provide archetypes; everything else provides none.
    pub fn provides(&self) -> &[String] {
        match self.meta() {
            Some(meta) => meta.provides(),
            None => &[],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Scalar(s) => write!(f, "{:?}", s),
            ValueKind::List(items) => write!(f, "list[{}]", items.len()),
            ValueKind::Map(entries) => write!(f, "map[{}]", entries.len()),
            ValueKind::Array(arr) => write!(f, "array[{}]", arr.len()),
            ValueKind::Composite(c) => write!(f, "composite({})", c.meta().type_name()),
            ValueKind::Restricted(r) => write!(f, "restricted({})", r.meta().type_name()),
        }
    }
}

impl From<ValueKind> for Value {
    fn from(kind: ValueKind) -> Self {
        Value::new(kind)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::new(ValueKind::List(items))
    }
}

impl From<IndexMap<Value, Value>> for Value {
    fn from(map: IndexMap<Value, Value>) -> Self {
        Value::new(ValueKind::Map(map.into_iter().collect()))
    }
}

macro_rules! impl_from_scalar_ty_for_value {
    ($ty:ty) => {
        impl From<$ty> for Value {
            fn from(val: $ty) -> Self {
                Value::scalar(val)
            }
        }
    };
}

impl_from_scalar_ty_for_value!(bool);
impl_from_scalar_ty_for_value!(u8);
impl_from_scalar_ty_for_value!(u16);
impl_from_scalar_ty_for_value!(u32);
impl_from_scalar_ty_for_value!(u64);
impl_from_scalar_ty_for_value!(i8);
impl_from_scalar_ty_for_value!(i16);
impl_from_scalar_ty_for_value!(i32);
impl_from_scalar_ty_for_value!(i64);
impl_from_scalar_ty_for_value!(f32);
impl_from_scalar_ty_for_value!(f64);
impl_from_scalar_ty_for_value!(char);
impl_from_scalar_ty_for_value!(String);
impl_from_scalar_ty_for_value!(Symbol);
impl_from_scalar_ty_for_value!(Timestamp);
impl_from_scalar_ty_for_value!(Uuid);

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::scalar(Scalar::String(val.to_string()))
    }
}

impl TryFrom<Value> for Scalar {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.kind {
            ValueKind::Scalar(scalar) => Ok(scalar),
            other => Err(Value {
                kind: other,
                descriptor: value.descriptor,
                in_array: value.in_array,
            }),
        }
    }
}

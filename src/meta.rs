//! Schema records (`Meta`), field declarations, and schema-driven value
//! construction: a `Meta` describes a named type (primitive, composite, or
//! restricted); a `Field` describes one slot of a composite.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::Descriptor;
use crate::error::{Error, ValidationError};
use crate::primitives::{Symbol, Timestamp, Uuid};
use crate::registry::Registry;
use crate::value::{ArrayValue, CompositeValue, RestrictedValue, Scalar, Value, ValueKind};

/// The three kinds of type a [`Meta`] can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// A format-code-backed primitive (`ubyte`, `string`, `list`, ...).
    Primitive,
    /// A named, field-structured list type.
    Composite,
    /// A named scalar type layered over a primitive or another restricted
    /// type, optionally limited to an enumerated set of choices.
    Restricted,
}

/// One `(category, format-code, width)` encoding a primitive type supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Subcategory name as it appears in schema XML (`fixed`, `variable`, ...).
    pub category: String,
    /// The format-code octet.
    pub code: u8,
    /// Payload width in octets, where fixed.
    pub width: usize,
}

/// A single field declaration of a composite type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    type_name: String,
    mandatory: bool,
    multiple: bool,
    requires: Vec<String>,
}

impl Field {
    /// Builds a field declaration. `type_name` is `"*"` for a polymorphic
    /// field, in which case `requires` names the archetypes it admits.
    pub fn new(
        name: String,
        type_name: String,
        mandatory: bool,
        multiple: bool,
        requires: Vec<String>,
    ) -> Self {
        Field {
            name,
            type_name,
            mandatory,
            multiple,
            requires,
        }
    }

    /// The field's declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's declared type name, or `"*"` if polymorphic.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether this field is polymorphic (`type="*"`).
    pub fn is_polymorphic(&self) -> bool {
        self.type_name == "*"
    }

    /// Whether the field is mandatory.
    pub fn mandatory(&self) -> bool {
        self.mandatory
    }

    /// Whether the field accepts a homogeneous sequence of values ("multiple"
    /// arity), wrapped as an [`ArrayValue`] once cleaned.
    pub fn multiple(&self) -> bool {
        self.multiple
    }

    /// The archetypes a polymorphic field's value must provide.
    pub fn requires(&self) -> &[String] {
        &self.requires
    }
}

/// A named type record: primitive, composite, or restricted.
#[derive(Debug)]
pub struct Meta {
    type_name: String,
    type_class: TypeClass,
    source: String,
    provides: Vec<String>,
    descriptor: Option<Descriptor>,
    /// The numeric half of a `<descriptor>` that declared both `name` and
    /// `code`, kept alongside `descriptor` (which holds the symbolic half in
    /// that case) so the type can be registered under both wire keys.
    numeric_descriptor: Option<Descriptor>,
    fields: Vec<Field>,
    choices: IndexMap<String, String>,
    encodings: Vec<Encoding>,
}

impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}
impl Eq for Meta {}

impl Meta {
    /// Builds a primitive type record.
    pub fn primitive(type_name: String, source: String, encodings: Vec<Encoding>) -> Self {
        Meta {
            type_name,
            type_class: TypeClass::Primitive,
            source,
            provides: Vec::new(),
            descriptor: None,
            numeric_descriptor: None,
            fields: Vec::new(),
            choices: IndexMap::new(),
            encodings,
        }
    }

    /// Builds a composite type record. `source` is always `"list"`. When a
    /// `<descriptor>` declared both `name` and `code`, `descriptor` carries
    /// the symbolic half and `numeric_descriptor` the numeric half, so the
    /// type registers under both wire keys.
    pub fn composite(
        type_name: String,
        descriptor: Option<Descriptor>,
        numeric_descriptor: Option<Descriptor>,
        fields: Vec<Field>,
        provides: Vec<String>,
    ) -> Self {
        Meta {
            type_name,
            type_class: TypeClass::Composite,
            source: "list".to_string(),
            provides,
            descriptor,
            numeric_descriptor,
            fields,
            choices: IndexMap::new(),
            encodings: Vec::new(),
        }
    }

    /// Builds a restricted type record over `source` (another primitive or
    /// restricted type name). See [`Meta::composite`] for the meaning of
    /// `numeric_descriptor`.
    pub fn restricted(
        type_name: String,
        source: String,
        descriptor: Option<Descriptor>,
        numeric_descriptor: Option<Descriptor>,
        choices: IndexMap<String, String>,
    ) -> Self {
        Meta {
            type_name,
            type_class: TypeClass::Restricted,
            source,
            provides: Vec::new(),
            descriptor,
            numeric_descriptor,
            fields: Vec::new(),
            choices,
            encodings: Vec::new(),
        }
    }

    /// Attaches the set of archetypes this type provides. Used when loading
    /// a restricted type that declares `provides="..."`.
    pub fn with_provides(mut self, provides: Vec<String>) -> Self {
        self.provides = provides;
        self
    }

    /// This type's unique name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Which of the three kinds of type this is.
    pub fn type_class(&self) -> TypeClass {
        self.type_class
    }

    /// For primitives, the subcategory name; for restricted types, the
    /// underlying type name; for composites, always `"list"`.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The archetypes this type provides, used to satisfy polymorphic `*`
    /// fields elsewhere in the schema.
    pub fn provides(&self) -> &[String] {
        &self.provides
    }

    /// This type's descriptor, if it has one (composite/restricted only).
    /// The symbolic half when the schema declared both; see
    /// [`Meta::numeric_descriptor`] for the other half.
    pub fn descriptor(&self) -> Option<&Descriptor> {
        self.descriptor.as_ref()
    }

    /// The numeric half of a `<descriptor>` that declared both `name` and
    /// `code`, or `None` if the schema gave only one form.
    pub fn numeric_descriptor(&self) -> Option<&Descriptor> {
        self.numeric_descriptor.as_ref()
    }

    /// Declared fields, in schema order (composite only).
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The `name -> raw value` choice map (restricted only).
    pub fn choices(&self) -> &IndexMap<String, String> {
        &self.choices
    }

    /// The encodings this primitive supports.
    pub fn encodings(&self) -> &[Encoding] {
        &self.encodings
    }

    /// Builds the descriptor-carrying scalar returned by
    /// `Meta.create_descriptor()`: the symbolic name as a `Symbol`, or,
    /// failing that, the numeric code as a `ulong`.
    pub fn create_descriptor(&self) -> Option<Value> {
        match &self.descriptor {
            Some(Descriptor::Symbolic(sym)) => Some(Value::scalar(sym.clone())),
            Some(Descriptor::Numeric(code)) => Some(Value::scalar(*code)),
            None => None,
        }
    }

    /// Builds a value of this type from `input`, coercing and validating per
    /// `type_class`.
    pub fn create(self: &Arc<Meta>, registry: &Registry, input: Input) -> Result<Value, Error> {
        if let TypeClass::Restricted = self.type_class {
            return self.create_restricted(registry, input);
        }

        let mut value = match self.type_class {
            TypeClass::Primitive => self.create_primitive(input)?,
            TypeClass::Composite => {
                let composite = self.create_composite(registry, input)?;
                Value::new(ValueKind::Composite(composite))
            }
            TypeClass::Restricted => unreachable!("handled above"),
        };
        if let Some(descriptor) = &self.descriptor {
            value = value.with_descriptor(descriptor.clone());
        }
        Ok(value)
    }

    fn create_primitive(&self, input: Input) -> Result<Value, Error> {
        coerce_primitive(&self.type_name, input)
    }

    fn create_composite(
        self: &Arc<Meta>,
        registry: &Registry,
        input: Input,
    ) -> Result<CompositeValue, Error> {
        let mut field_inputs: Vec<Input> = (0..self.fields.len()).map(|_| Input::Absent).collect();
        match input {
            Input::Mapping(entries) => {
                for (key, value) in entries {
                    let name = match key {
                        Input::Scalar(ScalarInput::Str(s)) => s,
                        _ => {
                            return Err(Error::type_error(
                                "composite mapping keys must be field names",
                            ))
                        }
                    };
                    let index = self
                        .fields
                        .iter()
                        .position(|f| f.name() == name)
                        .ok_or_else(|| {
                            Error::type_error(format!(
                                "{name:?} is not a field of {:?}",
                                self.type_name
                            ))
                        })?;
                    field_inputs[index] = value;
                }
            }
            Input::Sequence(items) => {
                if items.len() > self.fields.len() {
                    return Err(Error::type_error(format!(
                        "{:?} takes at most {} fields, got {}",
                        self.type_name,
                        self.fields.len(),
                        items.len()
                    )));
                }
                for (index, item) in items.into_iter().enumerate() {
                    field_inputs[index] = item;
                }
            }
            Input::Absent | Input::Null => {}
            _ => {
                return Err(Error::type_error(
                    "composite input must be a mapping or positional sequence",
                ))
            }
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        for (declared, field_input) in self.fields.iter().zip(field_inputs.into_iter()) {
            fields.push(clean_field(declared, registry, field_input)?);
        }
        Ok(CompositeValue::new(self.clone(), fields))
    }

    fn create_restricted(self: &Arc<Meta>, registry: &Registry, input: Input) -> Result<Value, Error> {
        let resolved = if !self.choices.is_empty() {
            match input {
                Input::Scalar(ScalarInput::Str(name)) => {
                    let raw = self.choices.get(&name).cloned().ok_or_else(|| -> Error {
                        ValidationError::Invalid {
                            type_name: self.type_name.clone(),
                            choice: name.clone(),
                        }
                        .into()
                    })?;
                    Input::Scalar(ScalarInput::Str(raw))
                }
                other => other,
            }
        } else {
            input
        };

        let source_meta = registry
            .get_by_name(&self.source)
            .ok_or_else(|| Error::EncoderMissing(self.source.clone()))?
            .clone();
        let inner = source_meta.create(registry, resolved)?;
        let mut value = Value::new(ValueKind::Restricted(RestrictedValue::new(
            self.clone(),
            inner,
        )));
        if let Some(descriptor) = &self.descriptor {
            value = value.with_descriptor(descriptor.clone());
        }
        Ok(value)
    }
}

/// A scalar coercion input: the loosely-typed shapes a caller may supply for
/// a primitive field, coerced into the field's declared canonical type.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarInput {
    /// `true`/`false`, or the strings `"true"`/`"false"`.
    Bool(bool),
    /// Any signed integer input.
    Int(i64),
    /// Any unsigned integer input, used when the value does not fit `i64`.
    UInt(u64),
    /// A real number (`float`/`double`).
    Float(f64),
    /// Text: `string`/`symbol`/choice names/`char` (single-character).
    Str(String),
    /// Raw bytes: `binary`, or the coercion-table's "string, UTF-8 encoded".
    Bytes(Vec<u8>),
    /// Milliseconds since the Unix epoch, for `timestamp`.
    TimestampMs(i64),
    /// A UUID value.
    Uuid(Uuid),
}

/// Input to `Meta::create`/`Field::clean`: either a raw scalar to coerce, an
/// already-built [`Value`], or one of the structural shapes (`Sequence`,
/// `Mapping`, `Pair`) used to build lists, composites, and polymorphic
/// fields respectively.
#[derive(Debug, Clone)]
pub enum Input {
    /// No value was supplied for this slot.
    Absent,
    /// An explicit AMQP null.
    Null,
    /// A raw scalar awaiting coercion.
    Scalar(ScalarInput),
    /// An already-built value — passed through unchanged by primitive
    /// coercion, and accepted directly at polymorphic `*` fields.
    Value(Value),
    /// An ordered sequence: a `list`/`array` primitive body, a `multiple`
    /// field's members, or a composite's fields given positionally.
    Sequence(Vec<Input>),
    /// A name-keyed mapping: a `map` primitive body (with `Input` keys), or
    /// a composite's fields given by name.
    Mapping(Vec<(Input, Input)>),
    /// A `(type-name, value)` pair, used to build a polymorphic `*` field or
    /// a DTO-layer typed field.
    Pair(String, Box<Input>),
}

impl From<bool> for Input {
    fn from(v: bool) -> Self {
        Input::Scalar(ScalarInput::Bool(v))
    }
}
impl From<i64> for Input {
    fn from(v: i64) -> Self {
        Input::Scalar(ScalarInput::Int(v))
    }
}
impl From<u64> for Input {
    fn from(v: u64) -> Self {
        Input::Scalar(ScalarInput::UInt(v))
    }
}
impl From<f64> for Input {
    fn from(v: f64) -> Self {
        Input::Scalar(ScalarInput::Float(v))
    }
}
impl From<String> for Input {
    fn from(v: String) -> Self {
        Input::Scalar(ScalarInput::Str(v))
    }
}
impl From<&str> for Input {
    fn from(v: &str) -> Self {
        Input::Scalar(ScalarInput::Str(v.to_string()))
    }
}
impl From<Value> for Input {
    fn from(v: Value) -> Self {
        Input::Value(v)
    }
}

impl Input {
    fn is_absent_or_null(&self) -> bool {
        matches!(self, Input::Absent | Input::Null)
    }
}

/// Narrows a coerced `u64` to the declared unsigned width, rejecting values
/// that don't fit rather than truncating them (the encoder's own width is
/// the source of truth for what's representable on the wire).
fn narrow_unsigned<T>(value: u64, name: &str) -> Result<Value, Error>
where
    T: TryFrom<u64> + Into<Scalar>,
{
    T::try_from(value)
        .map(Value::scalar)
        .map_err(|_| Error::type_error(format!("{value} does not fit in {name}")))
}

/// Narrows a coerced `i64` to the declared signed width, rejecting values
/// that don't fit rather than truncating them.
fn narrow_signed<T>(value: i64, name: &str) -> Result<Value, Error>
where
    T: TryFrom<i64> + Into<Scalar>,
{
    T::try_from(value)
        .map(Value::scalar)
        .map_err(|_| Error::type_error(format!("{value} does not fit in {name}")))
}

/// Coerces `input` into the canonical [`Value`] for primitive type `name`.
fn coerce_primitive(name: &str, input: Input) -> Result<Value, Error> {
    if let Input::Value(value) = input {
        return Ok(value);
    }

    match name {
        "boolean" => {
            let b = match input {
                Input::Scalar(ScalarInput::Bool(b)) => b,
                Input::Scalar(ScalarInput::Str(s)) => match s.as_str() {
                    "true" => true,
                    "false" => false,
                    other => !other.is_empty(),
                },
                Input::Scalar(ScalarInput::Int(i)) => i != 0,
                Input::Scalar(ScalarInput::UInt(u)) => u != 0,
                Input::Scalar(ScalarInput::Float(f)) => f != 0.0,
                Input::Scalar(ScalarInput::Bytes(bytes)) => !bytes.is_empty(),
                Input::Scalar(ScalarInput::TimestampMs(ms)) => ms != 0,
                Input::Scalar(ScalarInput::Uuid(_)) => true,
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            Ok(Value::scalar(b))
        }
        "ubyte" => narrow_unsigned::<u8>(as_u64(&input)?, name),
        "ushort" => narrow_unsigned::<u16>(as_u64(&input)?, name),
        "uint" => narrow_unsigned::<u32>(as_u64(&input)?, name),
        "ulong" => Ok(Value::scalar(as_u64(&input)?)),
        "byte" => narrow_signed::<i8>(as_i64(&input)?, name),
        "short" => narrow_signed::<i16>(as_i64(&input)?, name),
        "int" => narrow_signed::<i32>(as_i64(&input)?, name),
        "long" => Ok(Value::scalar(as_i64(&input)?)),
        "float" => Ok(Value::scalar(as_f64(&input)? as f32)),
        "double" => Ok(Value::scalar(as_f64(&input)?)),
        "timestamp" => {
            let ms = match input {
                Input::Scalar(ScalarInput::TimestampMs(ms)) => ms,
                Input::Scalar(ScalarInput::Int(i)) => i,
                Input::Scalar(ScalarInput::UInt(u)) => u as i64,
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            Ok(Value::scalar(Timestamp::from_milliseconds(ms)))
        }
        "uuid" => {
            let uuid = match input {
                Input::Scalar(ScalarInput::Uuid(u)) => u,
                Input::Scalar(ScalarInput::Bytes(bytes)) => {
                    Uuid::try_from(bytes.as_slice())?
                }
                Input::Scalar(ScalarInput::Str(s)) => {
                    let parsed = uuid::Uuid::parse_str(&s)
                        .map_err(|_| Error::EncoderMissing(name.to_string()))?;
                    Uuid::from(parsed)
                }
                // §4.8 also accepts a 128-bit integer; `ScalarInput` only
                // carries 64-bit integers, so the full range is reachable
                // only via `UInt`, but both signed and unsigned forms widen.
                Input::Scalar(ScalarInput::Int(i)) => Uuid::from(uuid::Uuid::from_u128(i as u128)),
                Input::Scalar(ScalarInput::UInt(u)) => Uuid::from(uuid::Uuid::from_u128(u as u128)),
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            Ok(Value::scalar(uuid))
        }
        "binary" => {
            let bytes = match input {
                Input::Scalar(ScalarInput::Bytes(b)) => b,
                Input::Scalar(ScalarInput::Str(s)) => s.into_bytes(),
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            Ok(Value::scalar(Scalar::Binary(bytes.into())))
        }
        "string" => {
            let s = match input {
                Input::Scalar(ScalarInput::Str(s)) => s,
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            Ok(Value::scalar(s))
        }
        "symbol" => {
            let s = match input {
                Input::Scalar(ScalarInput::Str(s)) => s,
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            Ok(Value::scalar(Symbol::from(s)))
        }
        "char" => {
            let s = match input {
                Input::Scalar(ScalarInput::Str(s)) => s,
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            let c = s
                .chars()
                .next()
                .ok_or_else(|| Error::EncoderMissing(name.to_string()))?;
            Ok(Value::scalar(c))
        }
        "list" => {
            let items = match input {
                Input::Sequence(items) => items,
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            let values = items
                .into_iter()
                .map(|item| coerce_any(item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::new(ValueKind::List(values)))
        }
        "map" => {
            let entries = match input {
                Input::Mapping(entries) => entries,
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            let mut out = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                out.push((coerce_any(k)?, coerce_any(v)?));
            }
            Ok(Value::new(ValueKind::Map(out)))
        }
        "array" => {
            let items = match input {
                Input::Sequence(items) => items,
                _ => return Err(Error::EncoderMissing(name.to_string())),
            };
            let values = items
                .into_iter()
                .map(coerce_any)
                .collect::<Result<Vec<_>, _>>()?;
            let array = ArrayValue::try_from_iter(values)?;
            Ok(Value::new(ValueKind::Array(array)))
        }
        "decimal32" | "decimal64" | "decimal128" => Err(Error::EncoderMissing(name.to_string())),
        other => Err(Error::EncoderMissing(other.to_string())),
    }
}

/// Coerces an already-shaped `Input` without knowing its declared type name
/// up front — used for untyped `list`/`map` members, which accept any
/// already-built value or scalar literal.
fn coerce_any(input: Input) -> Result<Value, Error> {
    match input {
        Input::Value(v) => Ok(v),
        Input::Null | Input::Absent => Ok(Value::NULL),
        Input::Scalar(ScalarInput::Bool(b)) => Ok(Value::scalar(b)),
        Input::Scalar(ScalarInput::Int(i)) => Ok(Value::scalar(i)),
        Input::Scalar(ScalarInput::UInt(u)) => Ok(Value::scalar(u)),
        Input::Scalar(ScalarInput::Float(f)) => Ok(Value::scalar(f)),
        Input::Scalar(ScalarInput::Str(s)) => Ok(Value::scalar(s)),
        Input::Scalar(ScalarInput::Bytes(b)) => Ok(Value::scalar(Scalar::Binary(b.into()))),
        Input::Scalar(ScalarInput::TimestampMs(ms)) => {
            Ok(Value::scalar(Timestamp::from_milliseconds(ms)))
        }
        Input::Scalar(ScalarInput::Uuid(u)) => Ok(Value::scalar(u)),
        Input::Sequence(items) => Ok(Value::new(ValueKind::List(
            items.into_iter().map(coerce_any).collect::<Result<_, _>>()?,
        ))),
        Input::Mapping(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                out.push((coerce_any(k)?, coerce_any(v)?));
            }
            Ok(Value::new(ValueKind::Map(out)))
        }
        Input::Pair(_, _) => Err(Error::type_error(
            "a (type-name, value) pair is only meaningful at a polymorphic field",
        )),
    }
}

fn as_i64(input: &Input) -> Result<i64, Error> {
    match input {
        Input::Scalar(ScalarInput::Int(i)) => Ok(*i),
        Input::Scalar(ScalarInput::UInt(u)) => Ok(*u as i64),
        _ => Err(Error::EncoderMissing("integer".to_string())),
    }
}

fn as_u64(input: &Input) -> Result<u64, Error> {
    match input {
        Input::Scalar(ScalarInput::UInt(u)) => Ok(*u),
        Input::Scalar(ScalarInput::Int(i)) if *i >= 0 => Ok(*i as u64),
        _ => Err(Error::EncoderMissing("integer".to_string())),
    }
}

fn as_f64(input: &Input) -> Result<f64, Error> {
    match input {
        Input::Scalar(ScalarInput::Float(f)) => Ok(*f),
        Input::Scalar(ScalarInput::Int(i)) => Ok(*i as f64),
        Input::Scalar(ScalarInput::UInt(u)) => Ok(*u as f64),
        _ => Err(Error::EncoderMissing("real number".to_string())),
    }
}

/// Validates and cleans `input` against `field`'s declaration, producing the
/// field's final [`Value`].
pub fn clean_field(
    field: &Field,
    registry: &Registry,
    input: Input,
) -> Result<Value, Error> {
    if input.is_absent_or_null() {
        return if field.mandatory() {
            Err(ValidationError::Required {
                field: field.name().to_string(),
            }
            .into())
        } else {
            Ok(Value::NULL)
        };
    }

    if field.is_polymorphic() {
        return clean_polymorphic_field(field, registry, input);
    }

    let meta = registry
        .get_by_name(field.type_name())
        .ok_or_else(|| Error::EncoderMissing(field.type_name().to_string()))?
        .clone();

    if field.multiple() {
        let items = match input {
            Input::Sequence(items) => items,
            _ => {
                return Err(ValidationError::Polymorphic {
                    field: field.name().to_string(),
                }
                .into())
            }
        };
        require_homogeneous_native_type(field, &items)?;
        let mut array = ArrayValue::new();
        for item in items {
            let value = meta.create(registry, item)?;
            array.push(value).map_err(|_| -> Error {
                ValidationError::Polymorphic {
                    field: field.name().to_string(),
                }
                .into()
            })?;
        }
        return Ok(Value::new(ValueKind::Array(array)));
    }

    match input {
        Input::Value(value) => Ok(value),
        other => meta.create(registry, other),
    }
}

fn clean_polymorphic_field(field: &Field, registry: &Registry, input: Input) -> Result<Value, Error> {
    match input {
        Input::Pair(type_name, boxed) => {
            let meta = registry
                .get_by_name(&type_name)
                .ok_or_else(|| Error::EncoderMissing(type_name.clone()))?
                .clone();
            if field.multiple() {
                let items = match *boxed {
                    Input::Sequence(items) => items,
                    other => vec![other],
                };
                let mut array = ArrayValue::new();
                for item in items {
                    let value = meta.create(registry, item)?;
                    check_requires(field, &value)?;
                    array.push(value).map_err(|_| -> Error {
                        ValidationError::Polymorphic {
                            field: field.name().to_string(),
                        }
                        .into()
                    })?;
                }
                return Ok(Value::new(ValueKind::Array(array)));
            }
            let value = meta.create(registry, *boxed)?;
            check_requires(field, &value)?;
            Ok(value)
        }
        Input::Value(value) => {
            check_requires(field, &value)?;
            Ok(value)
        }
        _ => Err(ValidationError::NotSatisfied {
            field: field.name().to_string(),
        }
        .into()),
    }
}

/// The native shape of a raw `Input`, ignoring its specific value — used to
/// check that a `multiple` field's members all share one native type before
/// any per-member coercion is attempted. Coercion failures on a
/// single homogeneous-looking member (e.g. an out-of-range integer) still
/// surface as their own error; only a mix of native shapes (an int next to
/// a string) is a `polymorphic` validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NativeKind {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Timestamp,
    Uuid,
    Value,
    Sequence,
    Mapping,
    Pair,
    Absent,
}

fn native_kind(input: &Input) -> NativeKind {
    match input {
        Input::Absent | Input::Null => NativeKind::Absent,
        Input::Scalar(ScalarInput::Bool(_)) => NativeKind::Bool,
        Input::Scalar(ScalarInput::Int(_)) | Input::Scalar(ScalarInput::UInt(_)) => NativeKind::Int,
        Input::Scalar(ScalarInput::Float(_)) => NativeKind::Float,
        Input::Scalar(ScalarInput::Str(_)) => NativeKind::Str,
        Input::Scalar(ScalarInput::Bytes(_)) => NativeKind::Bytes,
        Input::Scalar(ScalarInput::TimestampMs(_)) => NativeKind::Timestamp,
        Input::Scalar(ScalarInput::Uuid(_)) => NativeKind::Uuid,
        Input::Value(_) => NativeKind::Value,
        Input::Sequence(_) => NativeKind::Sequence,
        Input::Mapping(_) => NativeKind::Mapping,
        Input::Pair(_, _) => NativeKind::Pair,
    }
}

/// Fails with `ValidationError::Polymorphic` if `items` don't all share one
/// [`NativeKind`] (ints mixed with strings, say), before any of them are
/// coerced against the field's declared type.
fn require_homogeneous_native_type(field: &Field, items: &[Input]) -> Result<(), Error> {
    let mut kinds = items.iter().map(native_kind).filter(|k| *k != NativeKind::Absent);
    let Some(first) = kinds.next() else {
        return Ok(());
    };
    if kinds.all(|k| k == first) {
        Ok(())
    } else {
        Err(ValidationError::Polymorphic {
            field: field.name().to_string(),
        }
        .into())
    }
}

fn check_requires(field: &Field, value: &Value) -> Result<(), Error> {
    if field.requires().is_empty() {
        return Ok(());
    }
    let provides = value.provides();
    let satisfied = field.requires().iter().any(|need| provides.contains(need));
    if satisfied {
        Ok(())
    } else {
        Err(ValidationError::NotSatisfied {
            field: field.name().to_string(),
        }
        .into())
    }
}

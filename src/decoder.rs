//! Decoders: turn a parsed [`Node`] tree back into a [`Value`] tree.
//!
//! Two entry points:
//!
//! - [`decode_raw`] knows nothing but format codes — it never resolves a
//!   descriptor to a named type, so composites and restricted types come
//!   back as plain lists/scalars.
//! - [`decode_schema`] resolves every node against a [`Registry`]: numeric
//!   descriptor first, then symbolic descriptor, then bare format code,
//!   building [`CompositeValue`]/[`RestrictedValue`] where a [`Meta`]
//!   matches and falling back to the same structural decode `decode_raw`
//!   uses otherwise.

use std::sync::Arc;

use crate::descriptor::Descriptor;
use crate::error::{DecodeError, DescriptorKey, Error};
use crate::format_code::EncodingCodes;
use crate::meta::{Meta, TypeClass};
use crate::node::Node;
use crate::primitives::{Dec128, Dec32, Dec64, Symbol, Timestamp, Uuid};
use crate::registry::Registry;
use crate::value::{ArrayValue, CompositeValue, RestrictedValue, Scalar, Value, ValueKind};

/// Decodes `node` (parsed from `bytes`) using only format-code information.
pub fn decode_raw(node: &Node, bytes: &[u8]) -> Result<Value, Error> {
    decode_structural(node, bytes, &decode_raw)
}

/// Decodes `node` (parsed from `bytes`), resolving named types against
/// `registry` wherever a descriptor or registered format code matches.
pub fn decode_schema(registry: &Registry, node: &Node, bytes: &[u8]) -> Result<Value, Error> {
    match resolve_meta(registry, node)? {
        Some(meta) => decode_as(registry, &meta, node, bytes),
        None => decode_structural(node, bytes, &|n, b| decode_schema(registry, n, b)),
    }
}

/// Resolves `node` to a registered [`Meta`]: numeric descriptor, then
/// symbolic descriptor, then bare format code. A present-but-unregistered
/// descriptor is an error; an absent or unregistered bare format code is
/// not — it just means there's nothing more specific than the wire shape.
fn resolve_meta(registry: &Registry, node: &Node) -> Result<Option<Arc<Meta>>, Error> {
    if let Some(node_descriptor) = &node.descriptor {
        let descriptor = Descriptor::from(node_descriptor);
        return match registry.get_by_descriptor(&descriptor) {
            Some(meta) => Ok(Some(meta.clone())),
            None => Err(DecodeError::UnknownDescriptor(match descriptor {
                Descriptor::Symbolic(sym) => DescriptorKey::Symbolic(sym.as_str().to_string()),
                Descriptor::Numeric(code) => DescriptorKey::Numeric(code),
            })
            .into()),
        };
    }
    Ok(registry.get_by_code(node.format_code).cloned())
}

fn decode_as(registry: &Registry, meta: &Arc<Meta>, node: &Node, bytes: &[u8]) -> Result<Value, Error> {
    match meta.type_class() {
        TypeClass::Primitive => decode_structural(node, bytes, &|n, b| decode_schema(registry, n, b)),
        TypeClass::Composite => decode_composite(registry, meta, node, bytes),
        TypeClass::Restricted => decode_restricted(registry, meta, node, bytes),
    }
}

fn decode_composite(
    registry: &Registry,
    meta: &Arc<Meta>,
    node: &Node,
    bytes: &[u8],
) -> Result<Value, Error> {
    let mut fields = Vec::with_capacity(node.children.len());
    for child in &node.children {
        fields.push(decode_schema(registry, child, bytes)?);
    }
    if fields.len() > meta.fields().len() {
        return Err(DecodeError::SizeMismatch {
            expected: meta.fields().len(),
            actual: fields.len(),
        }
        .into());
    }
    // Trailing fields omitted by the writer (elision, per the encoder's own
    // trailing-null policy) decode back as null.
    while fields.len() < meta.fields().len() {
        fields.push(Value::NULL);
    }
    let mut value = Value::new(ValueKind::Composite(CompositeValue::new(meta.clone(), fields)));
    if let Some(descriptor) = meta.descriptor() {
        value = value.with_descriptor(descriptor.clone());
    }
    Ok(value)
}

fn decode_restricted(
    registry: &Registry,
    meta: &Arc<Meta>,
    node: &Node,
    bytes: &[u8],
) -> Result<Value, Error> {
    let source_meta = registry
        .get_by_name(meta.source())
        .ok_or_else(|| Error::EncoderMissing(meta.source().to_string()))?
        .clone();
    let inner = decode_as(registry, &source_meta, node, bytes)?;
    let mut value = Value::new(ValueKind::Restricted(RestrictedValue::new(meta.clone(), inner)));
    if let Some(descriptor) = meta.descriptor() {
        value = value.with_descriptor(descriptor.clone());
    }
    Ok(value)
}

/// Decodes `node` from its wire shape alone: fixed/variable scalar, `list0`,
/// compound (list/map), or array. `recurse` decodes each child node — either
/// [`decode_raw`] or a [`decode_schema`] closure bound to a registry.
fn decode_structural(
    node: &Node,
    bytes: &[u8],
    recurse: &dyn Fn(&Node, &[u8]) -> Result<Value, Error>,
) -> Result<Value, Error> {
    let code = node.format_code;

    if code == EncodingCodes::Null as u8 {
        return Ok(attach_descriptor(node, Value::NULL));
    }
    if code == EncodingCodes::List0 as u8 {
        return Ok(attach_descriptor(node, Value::new(ValueKind::List(Vec::new()))));
    }

    if node.count.is_some() {
        if node.array_element_code.is_some() {
            let mut array = ArrayValue::new();
            for child in &node.children {
                array.push(recurse(child, bytes)?)?;
            }
            return Ok(attach_descriptor(node, Value::new(ValueKind::Array(array))));
        }
        if is_map_code(code) {
            let flat = node
                .children
                .iter()
                .map(|child| recurse(child, bytes))
                .collect::<Result<Vec<_>, _>>()?;
            if flat.len() % 2 != 0 {
                return Err(DecodeError::InvalidLength.into());
            }
            let mut entries = Vec::with_capacity(flat.len() / 2);
            let mut items = flat.into_iter();
            while let (Some(key), Some(val)) = (items.next(), items.next()) {
                entries.push((key, val));
            }
            return Ok(attach_descriptor(node, Value::new(ValueKind::Map(entries))));
        }
        let items = node
            .children
            .iter()
            .map(|child| recurse(child, bytes))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(attach_descriptor(node, Value::new(ValueKind::List(items))));
    }

    let payload = &bytes[node.payload_offset..node.payload_offset + node.payload_length];
    let scalar = decode_scalar(code, payload)?;
    Ok(attach_descriptor(node, Value::scalar(scalar)))
}

fn is_map_code(code: u8) -> bool {
    code == EncodingCodes::Map8 as u8 || code == EncodingCodes::Map32 as u8
}

fn attach_descriptor(node: &Node, value: Value) -> Value {
    match &node.descriptor {
        Some(descriptor) => value.with_descriptor(Descriptor::from(descriptor)),
        None => value,
    }
}

fn decode_scalar(format_code: u8, payload: &[u8]) -> Result<Scalar, Error> {
    use EncodingCodes::*;
    let code = EncodingCodes::try_from(format_code)?;
    let scalar = match code {
        BooleanTrue => Scalar::Bool(true),
        BooleanFalse => Scalar::Bool(false),
        Boolean => Scalar::Bool(require_byte(payload)? != 0),
        UByte => Scalar::UByte(require_byte(payload)?),
        UShort => Scalar::UShort(u16::from_be_bytes(require_array(payload)?)),
        Uint0 => Scalar::UInt(0),
        SmallUint => Scalar::UInt(require_byte(payload)? as u32),
        UInt => Scalar::UInt(u32::from_be_bytes(require_array(payload)?)),
        Ulong0 => Scalar::ULong(0),
        SmallUlong => Scalar::ULong(require_byte(payload)? as u64),
        ULong => Scalar::ULong(u64::from_be_bytes(require_array(payload)?)),
        Byte => Scalar::Byte(require_byte(payload)? as i8),
        Short => Scalar::Short(i16::from_be_bytes(require_array(payload)?)),
        SmallInt => Scalar::Int(require_byte(payload)? as i8 as i32),
        Int => Scalar::Int(i32::from_be_bytes(require_array(payload)?)),
        SmallLong => Scalar::Long(require_byte(payload)? as i8 as i64),
        Long => Scalar::Long(i64::from_be_bytes(require_array(payload)?)),
        Float => Scalar::Float(f32::from_be_bytes(require_array(payload)?).into()),
        Double => Scalar::Double(f64::from_be_bytes(require_array(payload)?).into()),
        Decimal32 => Scalar::Decimal32(Dec32::try_from(payload)?),
        Decimal64 => Scalar::Decimal64(Dec64::try_from(payload)?),
        Decimal128 => Scalar::Decimal128(Dec128::try_from(payload)?),
        Char => {
            let bits = u32::from_be_bytes(require_array(payload)?);
            Scalar::Char(char::from_u32(bits).ok_or(DecodeError::InvalidUtf8)?)
        }
        Timestamp => Scalar::Timestamp(Timestamp::from(i64::from_be_bytes(require_array(payload)?))),
        Uuid => Scalar::Uuid(Uuid::try_from(payload)?),
        VBin8 | VBin32 => Scalar::Binary(payload.to_vec().into()),
        Str8 | Str32 => Scalar::String(String::from_utf8(payload.to_vec())?),
        Sym8 | Sym32 => Scalar::Symbol(Symbol::from(String::from_utf8(payload.to_vec())?)),
        other => return Err(DecodeError::DecoderMissing(other as u8).into()),
    };
    Ok(scalar)
}

fn require_byte(payload: &[u8]) -> Result<u8, Error> {
    payload.first().copied().ok_or(DecodeError::InvalidLength.into())
}

fn require_array<const N: usize>(payload: &[u8]) -> Result<[u8; N], Error> {
    payload.try_into().map_err(|_| DecodeError::InvalidLength.into())
}

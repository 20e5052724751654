//! The encoder: turns a [`Value`] tree into its AMQP 1.0 binary
//! representation, preferring the smallest format-code variant that fits
//! each value (`uint0`/`smalluint`/`uint`, `list0` for an empty list, and so
//! on) and writing directly from the tagged [`Value`] tree rather than
//! visiting it through a generic serialization trait.
//!
//! A constructor is `[optional 0x00 + descriptor][format-code byte]`.
//! Everything past that point — length fields, size/count headers, the
//! members of a list/map/array — is payload. Monomorphic arrays share one
//! constructor across all members, so every member must be re-rendered
//! under whichever format code the array settles on, even members whose own
//! natural encoding would have preferred a narrower form. The array settles
//! on the member with the largest natural payload, ties broken by first
//! occurrence — the only choice that's guaranteed to have room for every
//! other member's value.

use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::format_code::EncodingCodes;
use crate::value::{ArrayValue, Scalar, Value, ValueKind};

/// Encodes `value` to its binary representation.
pub fn encode(value: &Value) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    encode_value(&mut buf, value)?;
    Ok(buf)
}

/// Appends `value`'s full encoding (constructor and payload) to `buf`.
fn encode_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), Error> {
    if let ValueKind::Restricted(restricted) = value.kind() {
        if let Some(descriptor) = value.descriptor() {
            buf.push(0x00);
            encode_descriptor(buf, descriptor);
        }
        return encode_value(buf, restricted.inner());
    }

    if let Some(descriptor) = value.descriptor() {
        buf.push(0x00);
        encode_descriptor(buf, descriptor);
    }
    let (code, payload) = render_payload(value, None, false)?;
    buf.push(code);
    buf.extend(payload);
    Ok(())
}

/// Unwraps nested `Restricted` layers down to the first non-`Restricted`
/// value. Used when picking an array's shared member representation: a
/// restricted value's own descriptor is carried by the array's shared
/// constructor (enforced by every member sharing one [`Descriptor`] via
/// [`ArrayValue::push`]), so only the bottom value's format code matters for
/// payload rendering.
fn bottom_value(value: &Value) -> &Value {
    match value.kind() {
        ValueKind::Restricted(restricted) => bottom_value(restricted.inner()),
        _ => value,
    }
}

/// Renders a value's format code and the bytes following it. `forced`, when
/// set, pins the format code (and therefore the header width of variable and
/// compound forms) instead of picking the natural smallest representation —
/// used when rendering array members under the array's chosen shared code.
/// `for_array` additionally rules out value-fixed zero-payload codes (only
/// `bool`'s `true`/`false` codes, currently) that can't stand in for an
/// arbitrary same-type sibling.
fn render_payload(value: &Value, forced: Option<u8>, for_array: bool) -> Result<(u8, Vec<u8>), Error> {
    match value.kind() {
        ValueKind::Null => Ok((EncodingCodes::Null as u8, Vec::new())),
        ValueKind::Scalar(scalar) => render_scalar(scalar, forced, for_array),
        ValueKind::List(items) => match forced {
            Some(code) => render_list_forced(items, code),
            None => encode_list_body(items),
        },
        ValueKind::Map(entries) => match forced {
            Some(code) => render_map_forced(entries, code),
            None => encode_map_body(entries),
        },
        ValueKind::Array(array) => {
            if array.is_empty() {
                // Lossy by design: an empty array carries no member to show
                // what it's an array of, so it round-trips as `Null`.
                return Ok((EncodingCodes::Null as u8, Vec::new()));
            }
            match forced {
                Some(code) => render_array_forced(array, code),
                None => build_array_body(array, None),
            }
        }
        ValueKind::Composite(composite) => match forced {
            Some(code) => render_list_forced(composite.encoded_fields(), code),
            None => encode_list_body(composite.encoded_fields()),
        },
        // encode_value unwraps Restricted before calling render_payload, and
        // build_array_body only ever passes it bottom_value()'d members.
        ValueKind::Restricted(_) => unreachable!("Restricted values are unwrapped before rendering"),
    }
}

fn render_scalar(scalar: &Scalar, forced: Option<u8>, for_array: bool) -> Result<(u8, Vec<u8>), Error> {
    use EncodingCodes::*;
    match scalar {
        Scalar::Bool(b) => {
            if for_array || forced.is_some() {
                Ok((Boolean as u8, vec![*b as u8]))
            } else if *b {
                Ok((BooleanTrue as u8, Vec::new()))
            } else {
                Ok((BooleanFalse as u8, Vec::new()))
            }
        }
        Scalar::UByte(v) => Ok((UByte as u8, vec![*v])),
        Scalar::UShort(v) => Ok((UShort as u8, v.to_be_bytes().to_vec())),
        Scalar::UInt(v) => Ok(uint_form(*v, forced)),
        Scalar::ULong(v) => Ok(ulong_form(*v, forced)),
        Scalar::Byte(v) => Ok((Byte as u8, vec![*v as u8])),
        Scalar::Short(v) => Ok((Short as u8, v.to_be_bytes().to_vec())),
        Scalar::Int(v) => Ok(int_form(*v, forced)),
        Scalar::Long(v) => Ok(long_form(*v, forced)),
        Scalar::Float(v) => Ok((Float as u8, v.into_inner().to_be_bytes().to_vec())),
        Scalar::Double(v) => Ok((Double as u8, v.into_inner().to_be_bytes().to_vec())),
        Scalar::Decimal32(d) => Ok((Decimal32 as u8, d.into_inner().to_vec())),
        Scalar::Decimal64(d) => Ok((Decimal64 as u8, d.into_inner().to_vec())),
        Scalar::Decimal128(d) => Ok((Decimal128 as u8, d.into_inner().to_vec())),
        Scalar::Char(c) => Ok((Char as u8, (*c as u32).to_be_bytes().to_vec())),
        Scalar::Timestamp(t) => Ok((Timestamp as u8, t.milliseconds().to_be_bytes().to_vec())),
        Scalar::Uuid(u) => Ok((Uuid as u8, u.as_bytes().to_vec())),
        Scalar::Binary(b) => Ok(binary_form(b, forced)),
        Scalar::String(s) => Ok(string_form(s, forced)),
        Scalar::Symbol(s) => Ok(symbol_form(s.as_str(), forced)),
    }
}

fn uint_form(v: u32, forced: Option<u8>) -> (u8, Vec<u8>) {
    use EncodingCodes::*;
    let code = forced.unwrap_or_else(|| match v {
        0 => Uint0 as u8,
        1..=255 => SmallUint as u8,
        _ => UInt as u8,
    });
    let payload = if code == Uint0 as u8 {
        Vec::new()
    } else if code == SmallUint as u8 {
        vec![v as u8]
    } else {
        v.to_be_bytes().to_vec()
    };
    (code, payload)
}

fn ulong_form(v: u64, forced: Option<u8>) -> (u8, Vec<u8>) {
    use EncodingCodes::*;
    let code = forced.unwrap_or_else(|| match v {
        0 => Ulong0 as u8,
        1..=255 => SmallUlong as u8,
        _ => ULong as u8,
    });
    let payload = if code == Ulong0 as u8 {
        Vec::new()
    } else if code == SmallUlong as u8 {
        vec![v as u8]
    } else {
        v.to_be_bytes().to_vec()
    };
    (code, payload)
}

fn int_form(v: i32, forced: Option<u8>) -> (u8, Vec<u8>) {
    use EncodingCodes::*;
    let code = forced.unwrap_or_else(|| match v {
        -128..=127 => SmallInt as u8,
        _ => Int as u8,
    });
    let payload = if code == SmallInt as u8 {
        vec![v as i8 as u8]
    } else {
        v.to_be_bytes().to_vec()
    };
    (code, payload)
}

fn long_form(v: i64, forced: Option<u8>) -> (u8, Vec<u8>) {
    use EncodingCodes::*;
    let code = forced.unwrap_or_else(|| match v {
        -128..=127 => SmallLong as u8,
        _ => Long as u8,
    });
    let payload = if code == SmallLong as u8 {
        vec![v as i8 as u8]
    } else {
        v.to_be_bytes().to_vec()
    };
    (code, payload)
}

fn binary_form(bytes: &bytes::Bytes, forced: Option<u8>) -> (u8, Vec<u8>) {
    use EncodingCodes::*;
    variable_form(bytes, forced, VBin8 as u8, VBin32 as u8)
}

fn string_form(s: &str, forced: Option<u8>) -> (u8, Vec<u8>) {
    use EncodingCodes::*;
    variable_form(s.as_bytes(), forced, Str8 as u8, Str32 as u8)
}

fn symbol_form(s: &str, forced: Option<u8>) -> (u8, Vec<u8>) {
    use EncodingCodes::*;
    variable_form(s.as_bytes(), forced, Sym8 as u8, Sym32 as u8)
}

/// Shared short-form/long-form rendering for the `vbin`/`str`/`sym` families,
/// all of which frame as `<length, in header-width bytes><bytes>`.
fn variable_form(bytes: &[u8], forced: Option<u8>, short_code: u8, long_code: u8) -> (u8, Vec<u8>) {
    let code = forced.unwrap_or_else(|| if bytes.len() <= 255 { short_code } else { long_code });
    let header_width = if code == short_code { 1 } else { 4 };
    let mut payload = Vec::with_capacity(header_width + bytes.len());
    write_be(&mut payload, bytes.len(), header_width);
    payload.extend_from_slice(bytes);
    (code, payload)
}

fn write_be(buf: &mut Vec<u8>, value: usize, width: usize) {
    match width {
        1 => buf.push(value as u8),
        4 => buf.extend_from_slice(&(value as u32).to_be_bytes()),
        _ => unreachable!("header width is always 1 or 4"),
    }
}

/// `max(length + 1, count) < 256` is the short-form eligibility rule shared
/// by list, map, and array framing: the size field counts itself (hence
/// `+ 1`) and must fit in the chosen header width alongside the count field.
fn choose_header_width(length: usize, count: usize) -> usize {
    if std::cmp::max(length + 1, count) < 256 {
        1
    } else {
        4
    }
}

fn encode_list_body(items: &[Value]) -> Result<(u8, Vec<u8>), Error> {
    if items.is_empty() {
        return Ok((EncodingCodes::List0 as u8, Vec::new()));
    }
    let mut body = Vec::new();
    for item in items {
        encode_value(&mut body, item)?;
    }
    frame_compound(body, items.len(), EncodingCodes::List8 as u8, EncodingCodes::List32 as u8, None)
}

fn render_list_forced(items: &[Value], forced_code: u8) -> Result<(u8, Vec<u8>), Error> {
    if forced_code == EncodingCodes::List0 as u8 {
        return Ok((forced_code, Vec::new()));
    }
    let mut body = Vec::new();
    for item in items {
        encode_value(&mut body, item)?;
    }
    let header_width = if forced_code == EncodingCodes::List8 as u8 { 1 } else { 4 };
    Ok((
        forced_code,
        frame_compound_body(body, items.len(), header_width),
    ))
}

fn encode_map_body(entries: &[(Value, Value)]) -> Result<(u8, Vec<u8>), Error> {
    let mut body = Vec::new();
    for (key, val) in entries {
        encode_value(&mut body, key)?;
        encode_value(&mut body, val)?;
    }
    frame_compound(
        body,
        entries.len() * 2,
        EncodingCodes::Map8 as u8,
        EncodingCodes::Map32 as u8,
        None,
    )
}

fn render_map_forced(entries: &[(Value, Value)], forced_code: u8) -> Result<(u8, Vec<u8>), Error> {
    let mut body = Vec::new();
    for (key, val) in entries {
        encode_value(&mut body, key)?;
        encode_value(&mut body, val)?;
    }
    let header_width = if forced_code == EncodingCodes::Map8 as u8 { 1 } else { 4 };
    Ok((
        forced_code,
        frame_compound_body(body, entries.len() * 2, header_width),
    ))
}

/// Frames a compound body (list/map), choosing short vs. long form unless
/// `forced_width` pins one.
fn frame_compound(
    body: Vec<u8>,
    count: usize,
    short_code: u8,
    long_code: u8,
    forced_width: Option<usize>,
) -> Result<(u8, Vec<u8>), Error> {
    let header_width = forced_width.unwrap_or_else(|| choose_header_width(body.len(), count));
    let code = if header_width == 1 { short_code } else { long_code };
    Ok((code, frame_compound_body(body, count, header_width)))
}

fn frame_compound_body(body: Vec<u8>, count: usize, header_width: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 * header_width + body.len());
    write_be(&mut out, header_width + body.len(), header_width);
    write_be(&mut out, count, header_width);
    out.extend(body);
    out
}

fn encode_descriptor(buf: &mut Vec<u8>, descriptor: &Descriptor) {
    use EncodingCodes::*;
    match descriptor {
        Descriptor::Symbolic(sym) => {
            let (code, payload) = variable_form(sym.as_str().as_bytes(), None, Sym8 as u8, Sym32 as u8);
            buf.push(code);
            buf.extend(payload);
        }
        Descriptor::Numeric(code) => match *code {
            0 => buf.push(Ulong0 as u8),
            1..=255 => {
                buf.push(SmallUlong as u8);
                buf.push(*code as u8);
            }
            _ => {
                buf.push(ULong as u8);
                buf.extend_from_slice(&code.to_be_bytes());
            }
        },
    }
}

/// Builds an array's shared-constructor body: picks the reference member
/// (largest natural payload, ties broken by first occurrence), re-renders
/// every member under the reference's format code, and frames the whole
/// thing as `array8`/`array32`. `forced_outer_width` overrides the array's
/// own size/count header width, used when an array itself is a member of an
/// outer array and must match its sibling arrays' width.
fn build_array_body(array: &ArrayValue, forced_outer_width: Option<usize>) -> Result<(u8, Vec<u8>), Error> {
    let members = array.members();
    let bottoms: Vec<&Value> = members.iter().map(bottom_value).collect();
    let naturals = bottoms
        .iter()
        .map(|v| render_payload(v, None, true))
        .collect::<Result<Vec<_>, _>>()?;

    let mut reference = 0;
    let mut best_len = naturals[0].1.len();
    for (i, (_, payload)) in naturals.iter().enumerate().skip(1) {
        if payload.len() > best_len {
            best_len = payload.len();
            reference = i;
        }
    }
    let forced_code = naturals[reference].0;

    let mut body = Vec::new();
    for bottom in &bottoms {
        let (code, payload) = render_payload(bottom, Some(forced_code), true)?;
        debug_assert_eq!(code, forced_code, "array members must share one constructor");
        body.extend(payload);
    }

    let mut ctor = Vec::new();
    if let Some(descriptor) = members[0].descriptor() {
        ctor.push(0x00);
        encode_descriptor(&mut ctor, descriptor);
    }
    ctor.push(forced_code);

    let members_length = ctor.len() + body.len();
    let count = members.len();
    let header_width =
        forced_outer_width.unwrap_or_else(|| choose_header_width(members_length, count));
    let code = if header_width == 1 {
        EncodingCodes::Array8 as u8
    } else {
        EncodingCodes::Array32 as u8
    };

    let mut out = Vec::with_capacity(2 * header_width + members_length);
    write_be(&mut out, header_width + members_length, header_width);
    write_be(&mut out, count, header_width);
    out.extend(ctor);
    out.extend(body);
    Ok((code, out))
}

fn render_array_forced(array: &ArrayValue, forced_code: u8) -> Result<(u8, Vec<u8>), Error> {
    let width = if forced_code == EncodingCodes::Array8 as u8 { 1 } else { 4 };
    build_array_body(array, Some(width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ArrayValue;

    #[test]
    fn encodes_standalone_true_as_zero_length_code() {
        let bytes = encode(&Value::scalar(true)).unwrap();
        assert_eq!(bytes, vec![EncodingCodes::BooleanTrue as u8]);
    }

    #[test]
    fn encodes_standalone_small_uint_as_smalluint() {
        let bytes = encode(&Value::scalar(7u32)).unwrap();
        assert_eq!(bytes, vec![EncodingCodes::SmallUint as u8, 0x07]);
    }

    #[test]
    fn encodes_zero_uint_as_uint0() {
        let bytes = encode(&Value::scalar(0u32)).unwrap();
        assert_eq!(bytes, vec![EncodingCodes::Uint0 as u8]);
    }

    #[test]
    fn encodes_array_of_uints_with_shared_smalluint_constructor() {
        let mut array = ArrayValue::new();
        for v in [1u32, 2, 3] {
            array.push(Value::scalar(v)).unwrap();
        }
        let value = Value::new(ValueKind::Array(array));
        let bytes = encode(&value).unwrap();
        // array8: code, size=0x04 (count byte + ctor byte + 3*0 payload... )
        assert_eq!(bytes[0], EncodingCodes::Array8 as u8);
        assert_eq!(bytes[2], 3); // count
        assert_eq!(bytes[3], EncodingCodes::SmallUint as u8);
        assert_eq!(&bytes[4..], &[1, 2, 3]);
    }

    #[test]
    fn encodes_array_of_strings_widening_short_members_to_match_the_longest() {
        let mut array = ArrayValue::new();
        for s in ["x", "a-much-longer-reference-member-string"] {
            array
                .push(Value::scalar(s.to_string()))
                .unwrap();
        }
        let value = Value::new(ValueKind::Array(array));
        let bytes = encode(&value).unwrap();
        assert_eq!(bytes[0], EncodingCodes::Array8 as u8);
        // shared constructor must be str8 (both members fit in a u8 length)
        assert_eq!(bytes[3], EncodingCodes::Str8 as u8);
        // first (shorter) member still carries a 1-byte length prefix
        assert_eq!(bytes[4], 1);
        assert_eq!(bytes[5], b'x');
    }

    #[test]
    fn encodes_mixed_bool_array_without_value_corruption() {
        let mut array = ArrayValue::new();
        array.push(Value::scalar(true)).unwrap();
        array.push(Value::scalar(false)).unwrap();
        let value = Value::new(ValueKind::Array(array));
        let bytes = encode(&value).unwrap();
        assert_eq!(bytes[3], EncodingCodes::Boolean as u8);
        assert_eq!(&bytes[4..6], &[1, 0]);
    }

    #[test]
    fn empty_array_encodes_as_null() {
        let array = ArrayValue::new();
        let value = Value::new(ValueKind::Array(array));
        let bytes = encode(&value).unwrap();
        assert_eq!(bytes, vec![EncodingCodes::Null as u8]);
    }

    #[test]
    fn encodes_descriptor_prefixed_scalar() {
        let value = Value::scalar(7u8).with_descriptor(Descriptor::Numeric(0x11));
        let bytes = encode(&value).unwrap();
        assert_eq!(
            bytes,
            vec![0x00, EncodingCodes::SmallUlong as u8, 0x11, EncodingCodes::UByte as u8, 0x07]
        );
    }
}

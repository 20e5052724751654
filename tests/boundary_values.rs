//! Fixed byte-pattern boundary values: small-form preference at the
//! signed/unsigned thresholds, and exact wire bytes for representative
//! values of each integer width plus the timestamp epoch/year-2000 cases.

use amqp_typesystem::encoder::encode;
use amqp_typesystem::format_code::EncodingCodes;
use amqp_typesystem::primitives::Timestamp;
use amqp_typesystem::value::Value;

fn bytes_of(value: Value) -> Vec<u8> {
    encode(&value).unwrap()
}

#[test]
fn ubyte_one() {
    assert_eq!(bytes_of(Value::scalar(1u8)), vec![EncodingCodes::UByte as u8, 0x01]);
}

#[test]
fn ushort_256() {
    assert_eq!(
        bytes_of(Value::scalar(256u16)),
        vec![EncodingCodes::UShort as u8, 0x01, 0x00]
    );
}

#[test]
fn uint_16777216_uses_long_form() {
    assert_eq!(
        bytes_of(Value::scalar(16_777_216u32)),
        vec![EncodingCodes::UInt as u8, 0x01, 0x00, 0x00, 0x00]
    );
}

#[test]
fn ulong_boundary_uses_long_form() {
    assert_eq!(
        bytes_of(Value::scalar(72_057_594_037_927_936u64)),
        vec![
            EncodingCodes::ULong as u8,
            0x01,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00
        ]
    );
}

#[test]
fn byte_negative_one() {
    assert_eq!(bytes_of(Value::scalar(-1i8)), vec![EncodingCodes::Byte as u8, 0xFF]);
}

#[test]
fn short_negative_256() {
    assert_eq!(
        bytes_of(Value::scalar(-256i16)),
        vec![EncodingCodes::Short as u8, 0xFF, 0x00]
    );
}

#[test]
fn int_negative_16777216_uses_long_form() {
    assert_eq!(
        bytes_of(Value::scalar(-16_777_216i32)),
        vec![EncodingCodes::Int as u8, 0xFF, 0x00, 0x00, 0x00]
    );
}

#[test]
fn long_negative_boundary_uses_long_form() {
    assert_eq!(
        bytes_of(Value::scalar(-72_057_594_037_927_936i64)),
        vec![
            EncodingCodes::Long as u8,
            0xFF,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00
        ]
    );
}

#[test]
fn small_int_preference_for_range() {
    for v in [-128i32, -1, 0, 1, 127] {
        let bytes = bytes_of(Value::scalar(v));
        assert_eq!(bytes[0], EncodingCodes::SmallInt as u8, "value {v} should use smallint");
        assert_eq!(bytes.len(), 2);
    }
    let bytes = bytes_of(Value::scalar(128i32));
    assert_eq!(bytes[0], EncodingCodes::Int as u8);
}

#[test]
fn small_uint_preference_and_zero_form() {
    assert_eq!(bytes_of(Value::scalar(0u32)), vec![EncodingCodes::Uint0 as u8]);
    for v in [1u32, 128, 255] {
        let bytes = bytes_of(Value::scalar(v));
        assert_eq!(bytes[0], EncodingCodes::SmallUint as u8);
    }
    let bytes = bytes_of(Value::scalar(256u32));
    assert_eq!(bytes[0], EncodingCodes::UInt as u8);
}

#[test]
fn empty_list_uses_list0() {
    let bytes = bytes_of(Value::new(amqp_typesystem::value::ValueKind::List(Vec::new())));
    assert_eq!(bytes, vec![EncodingCodes::List0 as u8]);
}

#[test]
fn timestamp_at_unix_epoch_is_eight_zero_octets() {
    let bytes = bytes_of(Value::scalar(Timestamp::from_milliseconds(0)));
    assert_eq!(bytes, vec![EncodingCodes::Timestamp as u8, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn timestamp_at_year_2000() {
    let bytes = bytes_of(Value::scalar(Timestamp::from_milliseconds(946_684_800_000)));
    assert_eq!(
        bytes,
        vec![EncodingCodes::Timestamp as u8, 0x00, 0x00, 0x00, 0xDC, 0x6A, 0xCF, 0xAC, 0x00]
    );
}

#[test]
fn float_exact_ieee_pattern() {
    assert_eq!(
        bytes_of(Value::scalar(1.0f32)),
        vec![EncodingCodes::Float as u8, 0x3F, 0x80, 0x00, 0x00]
    );
}

#[test]
fn double_exact_ieee_pattern() {
    assert_eq!(
        bytes_of(Value::scalar(1.0f64)),
        vec![EncodingCodes::Double as u8, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
}

//! Array encode/decode scenarios: monomorphic arrays of both fixed-width
//! and variable-width members, decoded back through the schema-blind path.

use amqp_typesystem::format_code::EncodingCodes;
use amqp_typesystem::value::{ArrayValue, Scalar, Value, ValueKind};
use amqp_typesystem::{decode_raw, encode, parse_buffer};

#[test]
fn array_of_uints_uses_shared_smalluint_constructor() {
    let array = ArrayValue::try_from_iter(vec![Value::scalar(1u32), Value::scalar(2u32), Value::scalar(3u32)])
        .unwrap();
    let value = Value::new(ValueKind::Array(array));

    let bytes = encode(&value).unwrap();
    assert_eq!(bytes[0], EncodingCodes::Array8 as u8);
    assert_eq!(bytes[3], EncodingCodes::SmallUint as u8);
    assert_eq!(&bytes[4..], &[1, 2, 3]);

    let node = parse_buffer(&bytes).unwrap();
    let decoded = decode_raw(&node, &bytes).unwrap();
    let members = decoded.as_array().unwrap().members();
    assert_eq!(members.len(), 3);
    for (member, expected) in members.iter().zip([1u32, 2, 3]) {
        assert_eq!(member.as_scalar(), Some(&Scalar::UInt(expected)));
    }
}

#[test]
fn array_of_strings_round_trips_with_per_member_length_prefixes() {
    let array = ArrayValue::try_from_iter(vec![
        Value::scalar("foo"),
        Value::scalar("bar"),
        Value::scalar("baz"),
    ])
    .unwrap();
    let value = Value::new(ValueKind::Array(array));

    let bytes = encode(&value).unwrap();
    let node = parse_buffer(&bytes).unwrap();
    let decoded = decode_raw(&node, &bytes).unwrap();

    let members = decoded.as_array().unwrap().members();
    let strings: Vec<&str> = members
        .iter()
        .map(|m| match m.as_scalar().unwrap() {
            Scalar::String(s) => s.as_str(),
            other => panic!("expected a string member, got {other:?}"),
        })
        .collect();
    assert_eq!(strings, vec!["foo", "bar", "baz"]);
}

#[test]
fn appending_a_mismatched_member_type_fails() {
    let mut array = ArrayValue::new();
    array.push(Value::scalar(1u32)).unwrap();
    let err = array.push(Value::scalar("not a uint"));
    assert!(err.is_err());
}

#[test]
fn empty_array_round_trips_lossily_as_null() {
    let array = ArrayValue::new();
    let value = Value::new(ValueKind::Array(array));
    let bytes = encode(&value).unwrap();
    assert_eq!(bytes, vec![EncodingCodes::Null as u8]);

    let node = parse_buffer(&bytes).unwrap();
    let decoded = decode_raw(&node, &bytes).unwrap();
    assert!(decoded.is_null());
}

use std::io::Cursor as IoCursor;

use aaobject::constants;
use aaobject::cursor::Cursor;
use aaobject::object::Object;
use aaobject::result::Error;
use aaobject::value::{decode_typed_value, TypedValue};
use assert_matches::assert_matches;
use declio::Encode;

fn fixed_str_bytes(s: &str, len: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = s.encode_utf16().flat_map(|c| c.to_le_bytes()).collect();
    bytes.resize(len, 0);
    bytes
}

fn var_str_bytes(s: &str) -> Vec<u8> {
    let units: Vec<u8> = s.encode_utf16().flat_map(|c| c.to_le_bytes()).collect();
    let mut bytes = (units.len() as u32).to_le_bytes().to_vec();
    bytes.extend_from_slice(&units);
    bytes
}

fn object_value(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut bytes = constants::OBJECT_VALUE_MAGIC.to_vec();
    bytes.push(tag);
    bytes.extend_from_slice(payload);
    bytes
}

fn push_skip(bytes: &mut Vec<u8>, len: usize) {
    bytes.resize(bytes.len() + len, 0);
}

fn build_header(is_template: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    if is_template {
        bytes.extend_from_slice(&constants::TEMPLATE_DISCRIMINATOR);
    } else {
        bytes.extend_from_slice(&2u32.to_le_bytes());
    }
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_IS_TEMPLATE);
    bytes.extend_from_slice(&7u32.to_le_bytes());
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_THIS_GOBJECTID);
    bytes.extend_from_slice(&fixed_str_bytes("Engineers", constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_SECURITY_GROUP);
    bytes.extend_from_slice(&9u32.to_le_bytes());
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_PARENT_GOBJECTID);
    bytes.extend_from_slice(&fixed_str_bytes("Tag1", constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_TAGNAME);
    bytes.extend_from_slice(&fixed_str_bytes("Tag1", constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_CONTAINED_NAME);
    bytes.extend_from_slice(&3u32.to_le_bytes());
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_CONFIG_VERSION);
    bytes.extend_from_slice(&fixed_str_bytes(
        "Galaxy.Area1.Tag1",
        constants::HIERARCHAL_NAME_LEN,
    ));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_HIERARCHAL_NAME);
    bytes.extend_from_slice(&fixed_str_bytes("HOST", constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_HOST_NAME);
    bytes.extend_from_slice(&fixed_str_bytes("Container1", constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_CONTAINER_NAME);
    bytes.extend_from_slice(&fixed_str_bytes("Area1", constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_AREA_NAME);
    bytes.extend_from_slice(&fixed_str_bytes("", constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_DERIVED_FROM);
    bytes.extend_from_slice(&fixed_str_bytes("", constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::HEADER_SKIP_AFTER_BASED_ON);
    bytes.extend_from_slice(&var_str_bytes("Galaxy"));
    bytes.push(if is_template { 0 } else { 1 });
    let tail_len = if is_template {
        constants::HEADER_TAIL_TEMPLATE
    } else {
        constants::HEADER_TAIL_INSTANCE
    };
    push_skip(&mut bytes, tail_len);
    bytes
}

fn build_section_group(name: &str) -> Vec<u8> {
    let mut bytes = 1u128.to_le_bytes().to_vec();
    bytes.extend_from_slice(&fixed_str_bytes(name, constants::FIXED_STRING_LEN));
    push_skip(&mut bytes, constants::SKIP_AFTER_SECTION_NAME);
    // UDA section: 16-byte header, count=0, end marker.
    push_skip(&mut bytes, constants::SKIP_EXTENSION_ATTR_HEADER);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&constants::END_MARKER);
    // Four placeholder None values.
    for _ in 0..4 {
        bytes.extend_from_slice(&object_value(0, &[]));
    }
    // Built-in section: count=0, no header, no end marker.
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

fn build_object_bytes(is_template: bool) -> Vec<u8> {
    let mut bytes = build_header(is_template);
    bytes.extend_from_slice(&build_section_group("Main"));
    push_skip(&mut bytes, constants::SKIP_BEFORE_HIDDEN_GROUP_UNK);
    push_skip(&mut bytes, constants::SKIP_BEFORE_HIDDEN_GROUP);
    push_skip(&mut bytes, constants::SKIP_BEFORE_HIDDEN_GROUP_ATTR);
    push_skip(&mut bytes, constants::SKIP_BEFORE_HIDDEN_GROUP_2);
    bytes.extend_from_slice(&build_section_group("Hidden"));
    bytes
}

#[test]
fn decodes_minimal_object_with_no_extensions() {
    let bytes = build_object_bytes(true);
    let object = Object::decode(&bytes).unwrap();
    assert!(object.header().is_template());
    assert_eq!(*object.header().base_gobjectid(), 1);
    assert_eq!(object.content().sections().len(), 2);
    assert!(object.content().extensions().is_empty());
    assert_eq!(*object.offset_after_decode(), bytes.len());
}

#[test]
fn truncated_object_reports_offset_and_need() {
    let bytes = build_object_bytes(true);
    let truncated = &bytes[..bytes.len() - 5];
    assert_matches!(
        Object::decode(truncated),
        Err(Error::UnexpectedEof { .. })
    );
}

#[test]
fn offset_after_decode_never_exceeds_buffer_len() {
    let bytes = build_object_bytes(false);
    let object = Object::decode(&bytes).unwrap();
    assert!(*object.offset_after_decode() <= bytes.len());
}

#[test]
fn integer_value_round_trips_at_value_level() {
    let bytes = object_value(2, &42u32.to_le_bytes());
    let mut cursor = Cursor::new(&bytes);
    let value = decode_typed_value(&mut cursor).unwrap();
    assert_eq!(value, TypedValue::Int(42));

    let mut out = IoCursor::new(Vec::new());
    value.encode((), &mut out).unwrap();
    assert_eq!(out.into_inner(), bytes);
}

#[test]
fn bool_value_round_trips_at_value_level() {
    let bytes = object_value(1, &[1]);
    let mut cursor = Cursor::new(&bytes);
    let value = decode_typed_value(&mut cursor).unwrap();
    assert_eq!(value, TypedValue::Bool(true));

    let mut out = IoCursor::new(Vec::new());
    value.encode((), &mut out).unwrap();
    assert_eq!(out.into_inner(), bytes);
}

#[test]
fn end_marker_mismatch_is_a_warning_not_an_error() {
    // An all-zero count UDA section whose terminator is non-zero should
    // still decode successfully; the mismatch is only logged.
    let mut bytes = Vec::new();
    push_skip(&mut bytes, constants::SKIP_EXTENSION_ATTR_HEADER);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&[1; 8]);
    let mut cursor = Cursor::new(&bytes);
    let section = aaobject::section::AttributeSection::decode(&mut cursor).unwrap();
    assert!(section.attributes().is_empty());
    assert_eq!(cursor.offset(), bytes.len());
}

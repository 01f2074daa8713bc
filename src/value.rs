use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use declio::Encode;

use crate::constants;
use crate::cursor::{filetime_to_instant, Cursor};
use crate::result::{Error, Result};

/// The wire tag selecting a [`TypedValue`] payload encoding. `Undefined`
/// never appears on the wire; it is the sentinel used for attribute
/// descriptors that were never populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DataType {
    Undefined = -1,
    None = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    Double = 4,
    String = 5,
    Time = 6,
    ElapsedTime = 7,
    Reference = 8,
    Status = 9,
    DataTypeTag = 10,
    SecurityClass = 11,
    DataQuality = 12,
    QualifiedEnum = 13,
    QualifiedStruct = 14,
    IntlString = 15,
    BigString = 16,
    ArrayBool = 65,
    ArrayInt = 66,
    ArrayFloat = 67,
    ArrayDouble = 68,
    ArrayString = 69,
    ArrayTime = 70,
    ArrayElapsedTime = 71,
    ArrayReference = 72,
    ArrayStatus = 73,
    ArrayDataType = 74,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedEnum {
    pub text: String,
    pub ordinal: u16,
    /// Two opaque ids whose meaning is not documented; preserved verbatim.
    pub ids: (u16, u16),
}

/// The decoded payload of one on-wire typed value. Closed over the set of
/// data types this format is known to use; anything else surfaces as
/// [`Error::UnknownDataType`] or [`Error::NotImplemented`] rather than being
/// silently coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    None,
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
    String(String),
    Time(SystemTime),
    ElapsedTime(Duration),
    /// Opaque reference payload; no further structure is known.
    Reference(Vec<u8>),
    QualifiedEnum(QualifiedEnum),
    IntlString(String),
    ArrayBool(Vec<bool>),
    ArrayInt(Vec<i32>),
    ArrayFloat(Vec<f32>),
    ArrayDouble(Vec<f64>),
    ArrayString(Vec<String>),
    ArrayTime(Vec<SystemTime>),
    ArrayElapsedTime(Vec<Duration>),
}

/// Reads one typed value: a 16-byte magic header, a 1-byte tag, and a
/// tag-dependent payload. A magic mismatch is a warning, not a failure.
pub fn decode_typed_value(cursor: &mut Cursor) -> Result<TypedValue> {
    let magic_offset = cursor.offset();
    let mut magic = [0u8; 16];
    for byte in magic.iter_mut() {
        *byte = cursor.read_u8()?;
    }
    if magic != constants::OBJECT_VALUE_MAGIC {
        log::warn!("object value magic mismatch at offset {magic_offset}: {magic:02x?}");
    }

    let tag_offset = cursor.offset();
    let tag = cursor.read_u8()? as i32;
    match tag {
        0 => Ok(TypedValue::None),
        1 => Ok(TypedValue::Bool(cursor.read_u8()? != 0)),
        2 => Ok(TypedValue::Int(cursor.read_u32()? as i32)),
        3 => Ok(TypedValue::Float(cursor.read_f32()?)),
        4 => Ok(TypedValue::Double(cursor.read_f64()?)),
        5 => {
            let mut blob = cursor.read_sub_blob()?;
            Ok(TypedValue::String(blob.read_var_str(4, 1)?))
        }
        6 => Ok(TypedValue::Time(cursor.read_filetime_var()?)),
        7 => Ok(TypedValue::ElapsedTime(cursor.read_duration_ticks()?)),
        8 => {
            let blob = cursor.read_sub_blob()?;
            Ok(TypedValue::Reference(blob.remaining_bytes().to_vec()))
        }
        13 => {
            let mut blob = cursor.read_sub_blob()?;
            let text = blob.read_var_str(4, 1)?;
            let ordinal = blob.read_u16()?;
            let id_a = blob.read_u16()?;
            let id_b = blob.read_u16()?;
            Ok(TypedValue::QualifiedEnum(QualifiedEnum {
                text,
                ordinal,
                ids: (id_a, id_b),
            }))
        }
        15 => {
            let mut blob = cursor.read_sub_blob()?;
            blob.seek_forward(4)?; // string index, not surfaced (see Open Questions)
            blob.seek_forward(4)?; // locale id, not surfaced
            Ok(TypedValue::IntlString(blob.read_var_str(4, 1)?))
        }
        16 => Err(Error::NotImplemented {
            offset: tag_offset,
            kind: "BigString",
        }),
        65 => {
            let (_, elements) = cursor.read_array()?;
            Ok(TypedValue::ArrayBool(
                elements.iter().map(|e| e.iter().any(|&b| b != 0)).collect(),
            ))
        }
        66 => {
            let (_, elements) = cursor.read_array()?;
            Ok(TypedValue::ArrayInt(
                elements
                    .iter()
                    .map(|e| i32::from_le_bytes(e[..4].try_into().unwrap()))
                    .collect(),
            ))
        }
        67 => {
            let (_, elements) = cursor.read_array()?;
            Ok(TypedValue::ArrayFloat(
                elements
                    .iter()
                    .map(|e| f32::from_le_bytes(e[..4].try_into().unwrap()))
                    .collect(),
            ))
        }
        68 => {
            let (_, elements) = cursor.read_array()?;
            Ok(TypedValue::ArrayDouble(
                elements
                    .iter()
                    .map(|e| f64::from_le_bytes(e[..8].try_into().unwrap()))
                    .collect(),
            ))
        }
        69 => Ok(TypedValue::ArrayString(decode_array_string(cursor)?)),
        70 => {
            let (_, elements) = cursor.read_array()?;
            Ok(TypedValue::ArrayTime(
                elements
                    .iter()
                    .map(|e| filetime_to_instant(u64::from_le_bytes(e[..8].try_into().unwrap())))
                    .collect(),
            ))
        }
        71 => {
            let (_, elements) = cursor.read_array()?;
            Ok(TypedValue::ArrayElapsedTime(
                elements
                    .iter()
                    .map(|e| {
                        crate::cursor::ticks_to_duration(u64::from_le_bytes(
                            e[..8].try_into().unwrap(),
                        ))
                    })
                    .collect(),
            ))
        }
        9 | 10 | 11 | 12 | 14 => Err(Error::NotImplemented {
            offset: tag_offset,
            kind: "Status/DataType/SecurityClass/DataQuality/QualifiedStruct",
        }),
        72 | 73 | 74 => Err(Error::NotImplemented {
            offset: tag_offset,
            kind: "ArrayReference/ArrayStatus/ArrayDataType",
        }),
        other => Err(Error::UnknownDataType {
            offset: tag_offset,
            tag: other,
        }),
    }
}

/// Array-of-string uses a nested blob per element: outer blob wraps a
/// 1-byte value type and an inner blob holding the variable-length string.
fn decode_array_string(cursor: &mut Cursor) -> Result<Vec<String>> {
    cursor.seek_forward(4)?;
    let count = cursor.read_u16()?;
    cursor.seek_forward(4)?;
    let mut values = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut outer = cursor.read_sub_blob()?;
        let _value_type = outer.read_u8()?;
        let mut inner = outer.read_sub_blob()?;
        values.push(inner.read_var_str(4, 1)?);
    }
    Ok(values)
}

fn tag_of(value: &TypedValue) -> u8 {
    match value {
        TypedValue::None => 0,
        TypedValue::Bool(_) => 1,
        TypedValue::Int(_) => 2,
        TypedValue::Float(_) => 3,
        TypedValue::Double(_) => 4,
        TypedValue::String(_) => 5,
        TypedValue::Time(_) => 6,
        TypedValue::ElapsedTime(_) => 7,
        TypedValue::Reference(_) => 8,
        TypedValue::QualifiedEnum(_) => 13,
        TypedValue::IntlString(_) => 15,
        TypedValue::ArrayBool(_) => 65,
        TypedValue::ArrayInt(_) => 66,
        TypedValue::ArrayFloat(_) => 67,
        TypedValue::ArrayDouble(_) => 68,
        TypedValue::ArrayString(_) => 69,
        TypedValue::ArrayTime(_) => 70,
        TypedValue::ArrayElapsedTime(_) => 71,
    }
}

fn encode_var_str<W: io::Write>(s: &str, writer: &mut W) -> std::result::Result<(), declio::Error> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let byte_len = (units.len() * 2) as u32;
    byte_len.encode(constants::ENDIANESS, writer)?;
    for unit in units {
        unit.encode(constants::ENDIANESS, writer)?;
    }
    Ok(())
}

fn instant_to_ticks(instant: SystemTime) -> u64 {
    let since_unix = instant.duration_since(UNIX_EPOCH).unwrap_or_default();
    since_unix.as_secs() * 10_000_000 + since_unix.subsec_nanos() as u64 / 100
        + crate::cursor::FILETIME_UNIX_DIFF_TICKS
}

impl Encode<()> for TypedValue {
    fn encode<W>(&self, _ctx: (), writer: &mut W) -> std::result::Result<(), declio::Error>
    where
        W: io::Write,
    {
        writer
            .write_all(&constants::OBJECT_VALUE_MAGIC)
            .map_err(declio::Error::wrap)?;
        tag_of(self).encode((), writer)?;
        match self {
            TypedValue::None => Ok(()),
            TypedValue::Bool(b) => (*b as u8).encode((), writer),
            TypedValue::Int(i) => (*i as u32).encode(constants::ENDIANESS, writer),
            TypedValue::Float(f) => f.encode(constants::ENDIANESS, writer),
            TypedValue::Double(d) => d.encode(constants::ENDIANESS, writer),
            TypedValue::String(s) => {
                let mut payload = Vec::new();
                encode_var_str(s, &mut payload)?;
                (payload.len() as u32).encode(constants::ENDIANESS, writer)?;
                writer.write_all(&payload).map_err(declio::Error::wrap)
            }
            TypedValue::Time(instant) => {
                let ticks = instant_to_ticks(*instant);
                8u32.encode(constants::ENDIANESS, writer)?;
                ticks.encode(constants::ENDIANESS, writer)
            }
            TypedValue::ElapsedTime(duration) => {
                let ticks = duration.as_secs() * 10_000_000 + duration.subsec_nanos() as u64 / 100;
                ticks.encode(constants::ENDIANESS, writer)
            }
            TypedValue::Reference(bytes) => {
                (bytes.len() as u32).encode(constants::ENDIANESS, writer)?;
                writer.write_all(bytes).map_err(declio::Error::wrap)
            }
            TypedValue::QualifiedEnum(qe) => {
                let mut payload = Vec::new();
                encode_var_str(&qe.text, &mut payload)?;
                qe.ordinal.encode(constants::ENDIANESS, &mut payload)?;
                qe.ids.0.encode(constants::ENDIANESS, &mut payload)?;
                qe.ids.1.encode(constants::ENDIANESS, &mut payload)?;
                (payload.len() as u32).encode(constants::ENDIANESS, writer)?;
                writer.write_all(&payload).map_err(declio::Error::wrap)
            }
            TypedValue::IntlString(s) => {
                let mut payload = Vec::new();
                0u32.encode(constants::ENDIANESS, &mut payload)?;
                0u32.encode(constants::ENDIANESS, &mut payload)?;
                encode_var_str(s, &mut payload)?;
                (payload.len() as u32).encode(constants::ENDIANESS, writer)?;
                writer.write_all(&payload).map_err(declio::Error::wrap)
            }
            TypedValue::ArrayBool(items) => encode_fixed_array(items, 4, writer, |v, w| {
                (*v as u8 as u32).encode(constants::ENDIANESS, w)
            }),
            TypedValue::ArrayInt(items) => {
                encode_fixed_array(items, 4, writer, |v, w| v.encode(constants::ENDIANESS, w))
            }
            TypedValue::ArrayFloat(items) => {
                encode_fixed_array(items, 4, writer, |v, w| v.encode(constants::ENDIANESS, w))
            }
            TypedValue::ArrayDouble(items) => {
                encode_fixed_array(items, 8, writer, |v, w| v.encode(constants::ENDIANESS, w))
            }
            TypedValue::ArrayTime(items) => encode_fixed_array(items, 8, writer, |v, w| {
                instant_to_ticks(*v).encode(constants::ENDIANESS, w)
            }),
            TypedValue::ArrayElapsedTime(items) => encode_fixed_array(items, 8, writer, |v, w| {
                let ticks = v.as_secs() * 10_000_000 + v.subsec_nanos() as u64 / 100;
                ticks.encode(constants::ENDIANESS, w)
            }),
            TypedValue::ArrayString(items) => {
                0u32.encode(constants::ENDIANESS, writer)?;
                (items.len() as u16).encode(constants::ENDIANESS, writer)?;
                0u32.encode(constants::ENDIANESS, writer)?;
                for item in items {
                    let mut inner = Vec::new();
                    encode_var_str(item, &mut inner)?;
                    let mut outer = Vec::new();
                    0u8.encode((), &mut outer)?;
                    (inner.len() as u32).encode(constants::ENDIANESS, &mut outer)?;
                    outer.write_all(&inner).map_err(declio::Error::wrap)?;
                    (outer.len() as u32).encode(constants::ENDIANESS, writer)?;
                    writer.write_all(&outer).map_err(declio::Error::wrap)?;
                }
                Ok(())
            }
        }
    }
}

fn encode_fixed_array<T, W, F>(
    items: &[T],
    element_len: u32,
    writer: &mut W,
    mut write_one: F,
) -> std::result::Result<(), declio::Error>
where
    W: io::Write,
    F: FnMut(&T, &mut W) -> std::result::Result<(), declio::Error>,
{
    0u32.encode(constants::ENDIANESS, writer)?;
    (items.len() as u16).encode(constants::ENDIANESS, writer)?;
    element_len.encode(constants::ENDIANESS, writer)?;
    for item in items {
        write_one(item, writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_magic(tag: u8, payload: &[u8]) -> Vec<u8> {
        let mut bytes = constants::OBJECT_VALUE_MAGIC.to_vec();
        bytes.push(tag);
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn decodes_integer() {
        let bytes = with_magic(2, &42u32.to_le_bytes());
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(decode_typed_value(&mut cursor).unwrap(), TypedValue::Int(42));
        assert_eq!(cursor.offset(), 21);
    }

    #[test]
    fn decodes_bool_true() {
        let bytes = with_magic(1, &[1]);
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(decode_typed_value(&mut cursor).unwrap(), TypedValue::Bool(true));
        assert_eq!(cursor.offset(), 18);
    }

    #[test]
    fn big_string_is_not_implemented() {
        let bytes = with_magic(16, &[]);
        let mut cursor = Cursor::new(&bytes);
        assert!(matches!(
            decode_typed_value(&mut cursor),
            Err(Error::NotImplemented { kind: "BigString", .. })
        ));
    }

    #[test]
    fn unknown_tag_is_reported() {
        let bytes = with_magic(200, &[]);
        let mut cursor = Cursor::new(&bytes);
        assert!(matches!(
            decode_typed_value(&mut cursor),
            Err(Error::UnknownDataType { tag: 200, .. })
        ));
    }

    #[test]
    fn qualified_enum_round_trips_fields() {
        let mut payload = Vec::new();
        let text_units: Vec<u16> = "RUN".encode_utf16().collect();
        payload.extend_from_slice(&((text_units.len() * 2) as u32).to_le_bytes());
        for u in text_units {
            payload.extend_from_slice(&u.to_le_bytes());
        }
        payload.extend_from_slice(&2u16.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        let mut blob = (payload.len() as u32).to_le_bytes().to_vec();
        blob.extend_from_slice(&payload);
        let bytes = with_magic(13, &blob);
        let mut cursor = Cursor::new(&bytes);
        let value = decode_typed_value(&mut cursor).unwrap();
        assert_eq!(
            value,
            TypedValue::QualifiedEnum(QualifiedEnum {
                text: "RUN".to_owned(),
                ordinal: 2,
                ids: (0, 0),
            })
        );
    }
}

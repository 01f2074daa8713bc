use derive_getters::Getters;

use crate::attribute::Attribute;
use crate::constants;
use crate::cursor::Cursor;
use crate::result::{Error, Result};
use crate::section::decode_built_in_list;
use crate::value::{decode_typed_value, TypedValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ExtensionType {
    UserDefinedExtension = 586,
    ScriptExtension = 612,
    InputExtension = 615,
    HistoryExtension = 618,
}

impl ExtensionType {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            586 => Some(Self::UserDefinedExtension),
            612 => Some(Self::ScriptExtension),
            615 => Some(Self::InputExtension),
            618 => Some(Self::HistoryExtension),
            _ => None,
        }
    }
}

/// A named scope attached to an object: an instance name, an extension
/// name, a parent reference, an attribute list and a message queue.
#[derive(Debug, Clone, Getters)]
pub struct Extension {
    extension_type: ExtensionType,
    instance_name: String,
    extension_name: String,
    primitive_name: String,
    parent_name: String,
    attributes: Vec<Attribute>,
    messages: Vec<TypedValue>,
}

impl Extension {
    /// Look-ahead only: does the next 4 bytes at `cursor` name a known
    /// extension section type? Consumes nothing.
    pub fn peek(cursor: &Cursor) -> Option<ExtensionType> {
        let bytes = cursor.remaining_bytes();
        if bytes.len() < 4 {
            return None;
        }
        let code = u32::from_le_bytes(bytes[..4].try_into().unwrap());
        ExtensionType::from_code(code)
    }

    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let offset = cursor.offset();
        let code = cursor.read_u32()?;
        let extension_type =
            ExtensionType::from_code(code).ok_or(Error::UnknownExtension { offset, code })?;

        let instance_name = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::SKIP_EXTENSION_FIELD_GAP)?;
        cursor.seek_forward(constants::SKIP_EXTENSION_HEADER_GAP)?;

        let extension_name = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::SKIP_EXTENSION_FIELD_GAP)?;
        cursor.seek_forward(constants::SKIP_EXTENSION_HEADER_GAP)?;

        let parent_name = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::SKIP_EXTENSION_FIELD_GAP)?;
        cursor.seek_forward(constants::SKIP_EXTENSION_ATTR_HEADER)?;

        let uda_count = cursor.read_u32()?;
        let mut attributes = Vec::with_capacity(uda_count as usize);
        for _ in 0..uda_count {
            attributes.push(Attribute::decode_descriptor_rich(cursor)?);
        }
        let marker = cursor.read_end_marker()?;
        if marker != constants::END_MARKER {
            log::warn!("extension attribute end-marker mismatch: {marker:02x?}");
        }

        let mut messages = Vec::new();
        while cursor.lookahead(&constants::OBJECT_VALUE_MAGIC) {
            messages.push(decode_typed_value(cursor)?);
        }

        // Name qualification applies only to the descriptor-rich attributes
        // read above; built-in-shape attributes are appended unqualified.
        for attr in &mut attributes {
            attr.qualify(&instance_name, &extension_name);
        }
        attributes.extend(decode_built_in_list(cursor)?);

        let primitive_name = if instance_name.is_empty() || extension_name.is_empty() {
            String::new()
        } else {
            format!("{instance_name}_{extension_name}")
        };

        Ok(Self {
            extension_type,
            instance_name,
            extension_name,
            primitive_name,
            parent_name,
            attributes,
            messages,
        })
    }
}

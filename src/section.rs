use derive_getters::Getters;

use crate::attribute::Attribute;
use crate::constants;
use crate::cursor::Cursor;
use crate::result::Result;
use crate::value::decode_typed_value;

/// A descriptor-rich (UDA) attribute section: an opaque 16-byte header, a
/// count, that many descriptor-rich attributes, and an 8-byte end-marker.
#[derive(Debug, Clone, Getters)]
pub struct AttributeSection {
    attributes: Vec<Attribute>,
}

impl AttributeSection {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        cursor.seek_forward(constants::SKIP_EXTENSION_ATTR_HEADER)?;
        let count = cursor.read_u32()?;
        let mut attributes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            attributes.push(Attribute::decode_descriptor_rich(cursor)?);
        }
        let marker = cursor.read_end_marker()?;
        if marker != constants::END_MARKER {
            log::warn!("attribute section end-marker mismatch: {marker:02x?}");
        }
        Ok(Self { attributes })
    }
}

/// The built-in-shape attribute list that follows a [`AttributeSection`]:
/// a count and that many built-in-shape attributes, with neither a header
/// blob nor an end-marker of its own.
pub fn decode_built_in_list(cursor: &mut Cursor) -> Result<Vec<Attribute>> {
    let count = cursor.read_u32()?;
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        attributes.push(Attribute::decode_built_in(cursor)?);
    }
    Ok(attributes)
}

/// Four placeholder typed-values separating the UDA and built-in sections
/// of the main content. Their payloads are parsed (to stay aligned) but not
/// surfaced; see Open Question 4 in the design notes.
pub fn skip_placeholder_values(cursor: &mut Cursor) -> Result<()> {
    for _ in 0..4 {
        decode_typed_value(cursor)?;
    }
    Ok(())
}

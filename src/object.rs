use std::fs;
use std::path::Path;

use derive_getters::Getters;

use crate::attribute::Attribute;
use crate::constants;
use crate::cursor::Cursor;
use crate::extension::Extension;
use crate::header::ObjectHeader;
use crate::result::Result;
use crate::section::{decode_built_in_list, skip_placeholder_values, AttributeSection};

/// One `(id, name, UDA-section, built-in-section)` group within the main
/// content. The main content contains exactly two of these: the object's
/// own attributes, and a second "hidden attributes" group whose purpose is
/// not otherwise documented.
#[derive(Debug, Clone, Getters)]
pub struct SectionGroup {
    section_id: u128,
    name: String,
    uda: AttributeSection,
    built_in: Vec<Attribute>,
}

impl SectionGroup {
    fn decode(cursor: &mut Cursor) -> Result<Self> {
        let section_id = cursor.read_int(16)?;
        let name = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::SKIP_AFTER_SECTION_NAME)?;
        let uda = AttributeSection::decode(cursor)?;
        skip_placeholder_values(cursor)?;
        let built_in = decode_built_in_list(cursor)?;
        Ok(Self {
            section_id,
            name,
            uda,
            built_in,
        })
    }
}

/// The ordered content that follows an [`ObjectHeader`]: the object's own
/// section-group, a "hidden attributes" section-group, and zero or more
/// named extensions.
#[derive(Debug, Clone, Getters)]
pub struct ObjectContent {
    sections: Vec<SectionGroup>,
    extensions: Vec<Extension>,
}

impl ObjectContent {
    fn decode(cursor: &mut Cursor) -> Result<Self> {
        let main = SectionGroup::decode(cursor)?;

        cursor.seek_forward(constants::SKIP_BEFORE_HIDDEN_GROUP_UNK)?;
        cursor.seek_forward(constants::SKIP_BEFORE_HIDDEN_GROUP)?;
        cursor.seek_forward(constants::SKIP_BEFORE_HIDDEN_GROUP_ATTR)?;
        cursor.seek_forward(constants::SKIP_BEFORE_HIDDEN_GROUP_2)?;
        let hidden = SectionGroup::decode(cursor)?;

        // The extension list starts immediately: its own opening fields
        // (section type, section name, and their gaps) are read by
        // `Extension::decode` itself, not pre-skipped here.
        let mut extensions = Vec::new();
        while Extension::peek(cursor).is_some() {
            extensions.push(Extension::decode(cursor)?);
        }

        Ok(Self {
            sections: vec![main, hidden],
            extensions,
        })
    }
}

/// A fully decoded object: header plus content.
#[derive(Debug, Clone, Getters)]
pub struct Object {
    header: ObjectHeader,
    content: ObjectContent,
    offset_after_decode: usize,
}

impl Object {
    /// Decodes a single object payload from an in-memory buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let header = ObjectHeader::decode(&mut cursor)?;
        let content = ObjectContent::decode(&mut cursor)?;
        Ok(Self {
            header,
            content,
            offset_after_decode: cursor.offset(),
        })
    }

    /// Reads `path` fully into memory and decodes it as a single object
    /// payload. Archive unwrapping is the caller's responsibility.
    pub fn decode_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::decode(&bytes)
    }
}

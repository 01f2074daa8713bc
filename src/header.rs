use derive_getters::Getters;

use crate::constants;
use crate::cursor::Cursor;
use crate::result::Result;

/// The fixed prologue shared by every object: identity, lineage and naming
/// fields, terminated by a template/instance-dependent tail of padding.
#[derive(Debug, Clone, Getters)]
pub struct ObjectHeader {
    base_gobjectid: u32,
    is_template: bool,
    this_gobjectid: u32,
    security_group: String,
    parent_gobjectid: u32,
    tagname: String,
    contained_name: String,
    config_version: u32,
    hierarchal_name: String,
    host_name: String,
    container_name: String,
    area_name: String,
    derived_from: String,
    based_on: String,
    galaxy_name: String,
}

impl ObjectHeader {
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let base_gobjectid = cursor.read_u32()?;

        // A run of four zero bytes right after base_gobjectid marks a
        // template; an instance's next field starts immediately instead.
        let is_template = cursor.lookahead(&constants::TEMPLATE_DISCRIMINATOR);
        if is_template {
            cursor.seek_forward(constants::TEMPLATE_DISCRIMINATOR.len())?;
        }

        cursor.seek_forward(constants::HEADER_SKIP_AFTER_IS_TEMPLATE)?;
        let this_gobjectid = cursor.read_u32()?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_THIS_GOBJECTID)?;
        let security_group = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_SECURITY_GROUP)?;
        let parent_gobjectid = cursor.read_u32()?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_PARENT_GOBJECTID)?;

        let tagname = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_TAGNAME)?;
        let contained_name = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_CONTAINED_NAME)?;
        let config_version = cursor.read_u32()?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_CONFIG_VERSION)?;
        let hierarchal_name = cursor.read_fixed_str(constants::HIERARCHAL_NAME_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_HIERARCHAL_NAME)?;
        let host_name = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_HOST_NAME)?;
        let container_name = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_CONTAINER_NAME)?;
        let area_name = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_AREA_NAME)?;
        let derived_from = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_DERIVED_FROM)?;
        let based_on = cursor.read_fixed_str(constants::FIXED_STRING_LEN)?;
        cursor.seek_forward(constants::HEADER_SKIP_AFTER_BASED_ON)?;
        let galaxy_name = cursor.read_var_str(4, 1)?;

        // A second, independent discriminator byte: zero selects the
        // template tail length. See Open Question 1 in the design notes
        // for what else this byte might encode.
        let tail_is_template = cursor.read_u8()? == 0;
        let tail_len = if tail_is_template {
            constants::HEADER_TAIL_TEMPLATE
        } else {
            constants::HEADER_TAIL_INSTANCE
        };
        cursor.seek_forward(tail_len)?;

        Ok(Self {
            base_gobjectid,
            is_template,
            this_gobjectid,
            security_group,
            parent_gobjectid,
            tagname,
            contained_name,
            config_version,
            hierarchal_name,
            host_name,
            container_name,
            area_name,
            derived_from,
            based_on,
            galaxy_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_str_bytes(s: &str, len: usize) -> Vec<u8> {
        let mut bytes: Vec<u8> = s.encode_utf16().flat_map(|c| c.to_le_bytes()).collect();
        bytes.resize(len, 0);
        bytes
    }

    fn build_header(is_template: bool, tail_is_template: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        if is_template {
            bytes.extend_from_slice(&constants::TEMPLATE_DISCRIMINATOR);
        } else {
            bytes.extend_from_slice(&2u32.to_le_bytes());
        }
        bytes.resize(bytes.len() + constants::HEADER_SKIP_AFTER_IS_TEMPLATE, 0);
        bytes.extend_from_slice(&7u32.to_le_bytes()); // this_gobjectid
        bytes.resize(
            bytes.len() + constants::HEADER_SKIP_AFTER_THIS_GOBJECTID,
            0,
        );
        bytes.extend_from_slice(&fixed_str_bytes("Engineers", constants::FIXED_STRING_LEN));
        bytes.resize(
            bytes.len() + constants::HEADER_SKIP_AFTER_SECURITY_GROUP,
            0,
        );
        bytes.extend_from_slice(&9u32.to_le_bytes()); // parent_gobjectid
        bytes.resize(
            bytes.len() + constants::HEADER_SKIP_AFTER_PARENT_GOBJECTID,
            0,
        );
        bytes.extend_from_slice(&fixed_str_bytes("Tag1", constants::FIXED_STRING_LEN));
        bytes.resize(bytes.len() + constants::HEADER_SKIP_AFTER_TAGNAME, 0);
        bytes.extend_from_slice(&fixed_str_bytes("Tag1", constants::FIXED_STRING_LEN));
        bytes.resize(
            bytes.len() + constants::HEADER_SKIP_AFTER_CONTAINED_NAME,
            0,
        );
        bytes.extend_from_slice(&3u32.to_le_bytes()); // config_version
        bytes.resize(
            bytes.len() + constants::HEADER_SKIP_AFTER_CONFIG_VERSION,
            0,
        );
        bytes.extend_from_slice(&fixed_str_bytes(
            "Galaxy.Area1.Tag1",
            constants::HIERARCHAL_NAME_LEN,
        ));
        bytes.resize(
            bytes.len() + constants::HEADER_SKIP_AFTER_HIERARCHAL_NAME,
            0,
        );
        bytes.extend_from_slice(&fixed_str_bytes("HOST", constants::FIXED_STRING_LEN));
        bytes.resize(bytes.len() + constants::HEADER_SKIP_AFTER_HOST_NAME, 0);
        bytes.extend_from_slice(&fixed_str_bytes("Container1", constants::FIXED_STRING_LEN));
        bytes.resize(
            bytes.len() + constants::HEADER_SKIP_AFTER_CONTAINER_NAME,
            0,
        );
        bytes.extend_from_slice(&fixed_str_bytes("Area1", constants::FIXED_STRING_LEN));
        bytes.resize(bytes.len() + constants::HEADER_SKIP_AFTER_AREA_NAME, 0);
        bytes.extend_from_slice(&fixed_str_bytes("", constants::FIXED_STRING_LEN));
        bytes.resize(bytes.len() + constants::HEADER_SKIP_AFTER_DERIVED_FROM, 0);
        bytes.extend_from_slice(&fixed_str_bytes("", constants::FIXED_STRING_LEN));
        bytes.resize(bytes.len() + constants::HEADER_SKIP_AFTER_BASED_ON, 0);
        let galaxy_units: Vec<u8> = "Galaxy"
            .encode_utf16()
            .flat_map(|c| c.to_le_bytes())
            .collect();
        bytes.extend_from_slice(&(galaxy_units.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&galaxy_units);
        bytes.push(if tail_is_template { 0 } else { 1 });
        let tail_len = if tail_is_template {
            constants::HEADER_TAIL_TEMPLATE
        } else {
            constants::HEADER_TAIL_INSTANCE
        };
        bytes.resize(bytes.len() + tail_len, 0);
        bytes
    }

    #[test]
    fn decodes_template_header() {
        let bytes = build_header(true, true);
        let mut cursor = Cursor::new(&bytes);
        let header = ObjectHeader::decode(&mut cursor).unwrap();
        assert!(header.is_template());
        assert_eq!(*header.base_gobjectid(), 1);
        assert_eq!(header.tagname(), "Tag1");
        assert_eq!(header.galaxy_name(), "Galaxy");
        assert_eq!(cursor.offset(), bytes.len());
    }

    #[test]
    fn decodes_instance_header_with_instance_tail() {
        let bytes = build_header(false, false);
        let mut cursor = Cursor::new(&bytes);
        let header = ObjectHeader::decode(&mut cursor).unwrap();
        assert!(!header.is_template());
        assert_eq!(cursor.offset(), bytes.len());
    }
}

use declio::ctx::Endian;

pub const ENDIANESS: Endian = Endian::Little;

/// 16-byte marker preceding every on-wire typed value.
pub const OBJECT_VALUE_MAGIC: [u8; 16] = [
    0xB1, 0x55, 0xD9, 0x51, 0x86, 0xB0, 0xD2, 0x11, 0xBF, 0xB1, 0x00, 0x10, 0x4B, 0x5F, 0x96, 0xA7,
];

/// 8 zero bytes closing an attribute section.
pub const END_MARKER: [u8; 8] = [0; 8];

/// 4 zero bytes immediately following `base_gobjectid` that mark a template.
pub const TEMPLATE_DISCRIMINATOR: [u8; 4] = [0; 4];

/// Tail padding length following `galaxy_name`, selected by the second
/// (separate) template discriminator byte read just before it.
pub const HEADER_TAIL_TEMPLATE: usize = 1353;
pub const HEADER_TAIL_INSTANCE: usize = 1352;

pub const FIXED_STRING_LEN: usize = 64;
pub const HIERARCHAL_NAME_LEN: usize = 130;

// Header field gaps, named for the field that precedes each one.
pub const HEADER_SKIP_AFTER_IS_TEMPLATE: usize = 4;
pub const HEADER_SKIP_AFTER_THIS_GOBJECTID: usize = 12;
pub const HEADER_SKIP_AFTER_SECURITY_GROUP: usize = 12;
pub const HEADER_SKIP_AFTER_PARENT_GOBJECTID: usize = 52;
pub const HEADER_SKIP_AFTER_TAGNAME: usize = 596;
pub const HEADER_SKIP_AFTER_CONTAINED_NAME: usize = 4 + 32;
pub const HEADER_SKIP_AFTER_CONFIG_VERSION: usize = 16;
pub const HEADER_SKIP_AFTER_HIERARCHAL_NAME: usize = 530;
pub const HEADER_SKIP_AFTER_HOST_NAME: usize = 2;
pub const HEADER_SKIP_AFTER_CONTAINER_NAME: usize = 596;
pub const HEADER_SKIP_AFTER_AREA_NAME: usize = 2;
pub const HEADER_SKIP_AFTER_DERIVED_FROM: usize = 596;
pub const HEADER_SKIP_AFTER_BASED_ON: usize = 528;

// Main-content gaps.
/// Padding between a section-group's id/name pair and its UDA section.
pub const SKIP_AFTER_SECTION_NAME: usize = 596;
/// An unexplained u32 field between the main content's first built-in
/// section and the gap that precedes the hidden section-group's id/name
/// pair; consumed but not interpreted (see Open Question on the
/// hidden-attributes gap).
pub const SKIP_BEFORE_HIDDEN_GROUP_UNK: usize = 4;
/// Padding between the main content's first built-in section and the
/// second section-group's id/name pair (two padding regions; see Open
/// Question on the hidden-attributes gap).
pub const SKIP_BEFORE_HIDDEN_GROUP: usize = 660;
/// A gap of its own ("Attribute ???" in the original), distinct from
/// `SKIP_EXTENSION_HEADER_GAP` even though both happen to be 20 bytes.
pub const SKIP_BEFORE_HIDDEN_GROUP_ATTR: usize = 20;
pub const SKIP_BEFORE_HIDDEN_GROUP_2: usize = 664;

// Extension-internal gaps (see extension.rs).
pub const SKIP_EXTENSION_FIELD_GAP: usize = 596;
pub const SKIP_EXTENSION_HEADER_GAP: usize = 20;
pub const SKIP_EXTENSION_ATTR_HEADER: usize = 16;

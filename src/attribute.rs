use derive_getters::Getters;

use crate::cursor::Cursor;
use crate::result::Result;
use crate::value::{decode_typed_value, DataType, TypedValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Permission {
    Undefined = -1,
    FreeAccess = 0,
    Operate = 1,
    SecuredWrite = 2,
    VerifiedWrite = 3,
    Tune = 4,
    Configure = 5,
    ViewOnly = 6,
}

impl Permission {
    fn from_wire(value: u32) -> Self {
        match value {
            0 => Self::FreeAccess,
            1 => Self::Operate,
            2 => Self::SecuredWrite,
            3 => Self::VerifiedWrite,
            4 => Self::Tune,
            5 => Self::Configure,
            6 => Self::ViewOnly,
            _ => Self::Undefined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Writeability {
    Undefined = -1,
    Calculated = 2,
    CalculatedRetentive = 3,
    ObjectWriteable = 5,
    UserWriteable = 10,
    ConfigOnly = 11,
}

impl Writeability {
    fn from_wire(value: u32) -> Self {
        match value {
            2 => Self::Calculated,
            3 => Self::CalculatedRetentive,
            5 => Self::ObjectWriteable,
            10 => Self::UserWriteable,
            11 => Self::ConfigOnly,
            _ => Self::Undefined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Locked {
    Undefined = -1,
    Unlocked = 0,
    Locked = 1,
    InheritedLock = 2,
}

impl Locked {
    fn from_wire(value: u32) -> Self {
        match value {
            0 => Self::Unlocked,
            1 => Self::Locked,
            2 => Self::InheritedLock,
            _ => Self::Undefined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Source {
    Undefined = -1,
    BuiltIn = 0,
    Inherited = 1,
    UserDefined = 2,
    UserExtended = 3,
}

/// One decoded attribute, regardless of which wire shape produced it.
/// Descriptor fields are set to their `Undefined` sentinel when the
/// built-in shape omitted its descriptor prefix.
#[derive(Debug, Clone, Getters)]
pub struct Attribute {
    id: u16,
    name: String,
    attr_type: DataType,
    array: bool,
    permission: Permission,
    write: Writeability,
    locked: Locked,
    parent_gobjectid: u32,
    parent_name: String,
    source: Source,
    primitive_name: String,
    value: TypedValue,
}

impl Attribute {
    /// Descriptor-rich (UDA) shape: name, kind, permission, lock and parent
    /// linkage precede the typed value.
    pub fn decode_descriptor_rich(cursor: &mut Cursor) -> Result<Self> {
        cursor.seek_forward(2)?;
        let id = cursor.read_u16()?;
        let name = cursor.read_var_str(2, 2)?;
        let attr_type_tag = cursor.read_u8()? as i32;
        let array = cursor.read_u32()? != 0;
        let permission = Permission::from_wire(cursor.read_u32()?);
        let write = Writeability::from_wire(cursor.read_u32()?);
        let locked = Locked::from_wire(cursor.read_u32()?);
        let parent_gobjectid = cursor.read_u32()?;
        cursor.seek_forward(8)?;
        let parent_name = cursor.read_var_str(2, 2)?;
        cursor.seek_forward(2)?;
        let value = decode_typed_value(cursor)?;

        Ok(Self {
            id,
            name,
            attr_type: data_type_from_tag(attr_type_tag),
            array,
            permission,
            write,
            locked,
            parent_gobjectid,
            parent_name,
            source: Source::UserDefined,
            primitive_name: String::new(),
            value,
        })
    }

    /// Built-in shape: an id, then either a bare typed value (descriptor
    /// prefix absent) or a short descriptor prefix followed by the value.
    pub fn decode_built_in(cursor: &mut Cursor) -> Result<Self> {
        let id = cursor.read_u16()?;
        cursor.seek_forward(2)?;

        let has_descriptor = !cursor.lookahead(&crate::constants::OBJECT_VALUE_MAGIC);
        let attr_type_tag = if has_descriptor {
            cursor.seek_forward(4)?;
            let tag = cursor.read_u8()? as i32;
            cursor.seek_forward(11)?;
            tag
        } else {
            DataType::Undefined as i32
        };
        let value = decode_typed_value(cursor)?;

        Ok(Self {
            id,
            name: String::new(),
            attr_type: data_type_from_tag(attr_type_tag),
            array: false,
            permission: Permission::Undefined,
            write: Writeability::Undefined,
            locked: Locked::Undefined,
            parent_gobjectid: 0,
            parent_name: String::new(),
            source: Source::BuiltIn,
            primitive_name: String::new(),
            value,
        })
    }

    /// Applies an extension's name qualification: `name` becomes
    /// `<section>.<name>` and `primitive_name` becomes `<section>_<ext>`,
    /// both only when section and extension names are non-empty.
    pub(crate) fn qualify(&mut self, section_name: &str, extension_name: &str) {
        if !section_name.is_empty() && !self.name.is_empty() {
            self.name = format!("{section_name}.{}", self.name);
        }
        if !section_name.is_empty() && !extension_name.is_empty() {
            self.primitive_name = format!("{section_name}_{extension_name}");
        }
    }
}

fn data_type_from_tag(tag: i32) -> DataType {
    match tag {
        -1 => DataType::Undefined,
        0 => DataType::None,
        1 => DataType::Bool,
        2 => DataType::Int,
        3 => DataType::Float,
        4 => DataType::Double,
        5 => DataType::String,
        6 => DataType::Time,
        7 => DataType::ElapsedTime,
        8 => DataType::Reference,
        9 => DataType::Status,
        10 => DataType::DataTypeTag,
        11 => DataType::SecurityClass,
        12 => DataType::DataQuality,
        13 => DataType::QualifiedEnum,
        14 => DataType::QualifiedStruct,
        15 => DataType::IntlString,
        16 => DataType::BigString,
        65 => DataType::ArrayBool,
        66 => DataType::ArrayInt,
        67 => DataType::ArrayFloat,
        68 => DataType::ArrayDouble,
        69 => DataType::ArrayString,
        70 => DataType::ArrayTime,
        71 => DataType::ArrayElapsedTime,
        72 => DataType::ArrayReference,
        73 => DataType::ArrayStatus,
        74 => DataType::ArrayDataType,
        _ => DataType::Undefined,
    }
}

pub mod attribute;
pub mod constants;
pub mod cursor;
pub mod extension;
pub mod header;
pub mod object;
pub mod result;
pub mod section;
pub mod value;

pub use object::{Object, ObjectContent, SectionGroup};
pub use result::{Error, Result};

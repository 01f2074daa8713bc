use thiserror::Error;

pub type Result<A, E = Error> = std::result::Result<A, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoFailed(#[from] std::io::Error),
    #[error("unexpected end of input at offset {offset}, needed {needed} more byte(s)")]
    UnexpectedEof { offset: usize, needed: usize },
    #[error("invalid encoding at offset {offset}: {kind}")]
    InvalidEncoding { offset: usize, kind: &'static str },
    #[error("unknown data type tag {tag} at offset {offset}")]
    UnknownDataType { offset: usize, tag: i32 },
    #[error("unknown extension section type {code} at offset {offset}")]
    UnknownExtension { offset: usize, code: u32 },
    #[error("not implemented at offset {offset}: {kind}")]
    NotImplemented { offset: usize, kind: &'static str },
}

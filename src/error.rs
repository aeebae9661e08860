//! Contains the Error and Result type used throughout the crate.
use std::collections::TryReserveError;
use std::fmt::Display;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::compress::CompressionFault;
use crate::Tag;

/// Category of an [`Error`]. The discriminants are stable and can be
/// exchanged with other tools as plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ErrorKind {
    /// Reserved ordinal. Never carried by an [`Error`].
    NoError = 0,
    /// An allocation failed.
    Memory = 1,
    /// The input ended early, failed, or contained malformed data.
    Read = 2,
    /// The output could not be written.
    Write = 3,
    /// A compressed stream had a bad header, checksum or was truncated.
    Compression = 4,
    /// A tag byte outside of the known tags.
    UnknownTag = 5,
    /// The data does not have the shape the schema or format requires.
    WrongType = 6,
    /// Some size or nesting limit was exceeded.
    ObjectTooLarge = 7,
    /// The root compound was not named as expected.
    WrongRootName = 8,
    /// A schema description could not be understood.
    InvalidSchema = 9,
}

/// Various errors that can occur while reading or writing NBT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::new(ErrorKind::InvalidSchema, msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::new(ErrorKind::WrongType, msg.to_string())
    }
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Error::new(ErrorKind::Memory, format!("allocation failed: {}", e))
    }
}

impl Error {
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
        }
    }

    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The stable numeric code of the error kind.
    pub fn code(&self) -> u8 {
        self.kind.into()
    }

    /// Classify an IO error. Faults raised by the compression layer keep
    /// their own kind, anything else becomes `fallback`.
    pub fn from_io(e: std::io::Error, fallback: ErrorKind) -> Self {
        if let Some(fault) = e
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<CompressionFault>())
        {
            return Error::new(ErrorKind::Compression, fault.to_string());
        }

        match (fallback, e.kind()) {
            (ErrorKind::Read, std::io::ErrorKind::UnexpectedEof) => {
                Error::unexpected_eof()
            }
            (ErrorKind::Write, _) => Error::new(fallback, format!("io error writing: {}", e)),
            _ => Error::new(fallback, format!("io error: {}", e)),
        }
    }

    pub(crate) fn read(e: std::io::Error) -> Self {
        Error::from_io(e, ErrorKind::Read)
    }

    pub(crate) fn write(e: std::io::Error) -> Self {
        Error::from_io(e, ErrorKind::Write)
    }

    pub(crate) fn unexpected_eof() -> Error {
        Error::new(ErrorKind::Read, "eof: unexpectedly ran out of input")
    }

    pub(crate) fn invalid_tag(tag: u8) -> Error {
        Error::new(
            ErrorKind::UnknownTag,
            format!("invalid nbt tag value: {}", tag),
        )
    }

    pub(crate) fn nonunicode_string(data: &[u8]) -> Error {
        Error::new(
            ErrorKind::Read,
            format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(data)
            ),
        )
    }

    pub(crate) fn wrong_type(expected: impl Display, found: impl Display) -> Error {
        Error::new(
            ErrorKind::WrongType,
            format!("wrong type: expected {}, found {}", expected, found),
        )
    }

    pub(crate) fn lossy_cast(value: impl std::fmt::Debug, target: Tag) -> Error {
        Error::new(
            ErrorKind::WrongType,
            format!("{:?} cannot be represented as {}", value, target),
        )
    }

    pub(crate) fn too_large(msg: impl Into<String>) -> Error {
        Error::new(ErrorKind::ObjectTooLarge, msg)
    }

    pub(crate) fn wrong_root_name(expected: &str, found: &str) -> Error {
        Error::new(
            ErrorKind::WrongRootName,
            format!(
                "wrong root name: expected {:?}, found {:?}",
                expected, found
            ),
        )
    }

    pub(crate) fn invalid_schema(msg: impl Into<String>) -> Error {
        Error::new(ErrorKind::InvalidSchema, msg)
    }

    pub(crate) fn compression(msg: impl Into<String>) -> Error {
        Error::new(ErrorKind::Compression, msg)
    }
}

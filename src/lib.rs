//! nbtcodec reads and writes the binary NBT format used by *Minecraft* to
//! store level data, schematics and player files.
//!
//! * For the typed tree that mirrors the wire format see [`Value`].
//! * For the loosely typed tree applications usually work with see
//!   [`DynValue`].
//! * For describing the expected shape of a document see [`Schema`].
//! * For gzip/zlib/raw-deflate streams see [`compress`].
//!
//! ```toml
//! [dependencies]
//! nbtcodec = "0.1"
//! ```
//!
//! # Schemas
//!
//! NBT pins every number to a width, which a loose tree of numbers cannot
//! express. A [`Schema`] fills that gap: it names the expected tag at each
//! position of a document. When reading, a schema is enforced (wrong
//! structure is an error, wrong number widths are converted). When writing,
//! it selects the width of each number. Schemas are optional. Without one,
//! numbers read from a document remember their width so they are written
//! back unchanged, and numbers created by the application are written with
//! the smallest type that holds them.
//!
//! # Quick example
//!
//! ```
//! use nbtcodec::{from_bytes, to_bytes, DynValue, ReadOptions, Schema, WriteOptions};
//!
//! # fn main() -> nbtcodec::error::Result<()> {
//! let schema: Schema = serde_json::from_str(r#"{ "Width": "short", "Blocks": "data" }"#).unwrap();
//!
//! let mut root = indexmap::IndexMap::new();
//! root.insert("Width".to_owned(), DynValue::integer(3));
//! root.insert("Blocks".to_owned(), DynValue::Data(vec![1, 2, 3]));
//! let root = DynValue::Map(root);
//!
//! let bytes = to_bytes(&root, "Schematic", &WriteOptions::default(), Some(&schema))?;
//! let decoded = from_bytes(&bytes, Some("Schematic"), &ReadOptions::default(), Some(&schema))?;
//!
//! assert_eq!(decoded.value, root);
//! # Ok(())
//! # }
//! ```
//!
//! # Compressed input
//!
//! Most NBT files on disk are gzip compressed, and chunks inside region
//! files are zlib compressed. [`from_reader`] and [`to_writer`] take an
//! optional [`CompressionMode`]; [`CompressionMode::AutoDetect`] tells gzip
//! and zlib apart by their headers.

pub mod compress;
pub mod de;
pub mod dynamic;
pub mod error;
pub mod schema;
pub mod ser;

mod io;
mod options;
mod value;

pub use compress::CompressionMode;
pub use dynamic::{DynValue, Number};
pub use io::*;
pub use options::*;
pub use schema::Schema;
pub use value::*;

#[cfg(test)]
mod test;

use std::fmt;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents an array of raw bytes.
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same tag.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
}

impl Tag {
    /// True for the six fixed-width number tags.
    pub fn is_numeric(self) -> bool {
        (Tag::Byte as u8..=Tag::Double as u8).contains(&(self as u8))
    }

    /// True for Byte, Short, Int and Long.
    pub fn is_integer(self) -> bool {
        (Tag::Byte as u8..=Tag::Long as u8).contains(&(self as u8))
    }

    /// The conventional name of the tag, eg. `TAG_Int_Array`.
    pub fn name(self) -> &'static str {
        match self {
            Tag::End => "TAG_End",
            Tag::Byte => "TAG_Byte",
            Tag::Short => "TAG_Short",
            Tag::Int => "TAG_Int",
            Tag::Long => "TAG_Long",
            Tag::Float => "TAG_Float",
            Tag::Double => "TAG_Double",
            Tag::ByteArray => "TAG_Byte_Array",
            Tag::String => "TAG_String",
            Tag::List => "TAG_List",
            Tag::Compound => "TAG_Compound",
            Tag::IntArray => "TAG_Int_Array",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

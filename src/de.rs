//! Reading binary NBT into [`Value`] trees.
//!
//! The [`Deserializer`] only requires `Read` on its input and consumes it
//! strictly in order, so it can sit directly on top of a
//! [`Decompressor`][`crate::compress::Decompressor`] or a socket. It does not
//! buffer; wrap unbuffered readers in a `BufReader`.
//!
//! ```
//! use nbtcodec::{de::read_value, ReadOptions, Schema, Value};
//!
//! let input = [
//!     10, 0, 0,                   // compound, empty name
//!     2, 0, 2, b'h', b'p', 0, 20, // short "hp" = 20
//!     0,                          // end
//! ];
//!
//! let (name, root) = read_value(&input[..], &Schema::Any, &ReadOptions::default()).unwrap();
//! assert_eq!(name, "");
//! assert_eq!(root.as_compound().unwrap()["hp"], Value::Short(20));
//! ```
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{Error, ErrorKind, Result};
use crate::schema::ANY;
use crate::{Compound, List, Limits, ReadOptions, Schema, Tag, Value};

// Lists can declare up to i32::MAX elements before a single one has been
// read, so only trust the count this far.
const MAX_LIST_PREALLOC: usize = 1024;

/// Reads one NBT document from a reader.
pub struct Deserializer<R: Read> {
    reader: R,
    limits: Limits,
    allow_fragments: bool,
    budget: usize,
    depth: usize,
}

impl<R: Read> Deserializer<R> {
    pub fn new(reader: R, options: &ReadOptions) -> Self {
        Self {
            reader,
            limits: options.limits,
            allow_fragments: options.allow_fragments,
            budget: options.limits.max_bytes,
            depth: 0,
        }
    }

    /// Gets a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes this deserializer, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read the root tag and its name. The root must be a compound unless
    /// fragments are allowed. Numbers are converted to the widths `schema`
    /// pins, and any structural disagreement with it is an error.
    pub fn read_root(&mut self, schema: &Schema) -> Result<(String, Value)> {
        let tag = self.read_tag()?;
        match tag {
            Tag::End => {
                return Err(Error::new(
                    ErrorKind::UnknownTag,
                    "invalid nbt: document starts with an end tag",
                ))
            }
            Tag::Compound => {}
            other if !self.allow_fragments => {
                return Err(Error::wrong_type(Tag::Compound, other));
            }
            _ => {}
        }

        schema.accepts(tag)?;
        let name = self.read_size_prefixed_string()?;
        let value = self.read_payload(tag, schema)?;
        Ok((name, value))
    }

    fn read_tag(&mut self) -> Result<Tag> {
        let tag = self.reader.read_u8().map_err(Error::read)?;
        Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
    }

    fn read_payload(&mut self, tag: Tag, schema: &Schema) -> Result<Value> {
        let value = match tag {
            Tag::End => return Err(Error::invalid_tag(0)),
            Tag::Byte => Value::Byte(self.reader.read_i8().map_err(Error::read)?),
            Tag::Short => Value::Short(self.reader.read_i16::<BigEndian>().map_err(Error::read)?),
            Tag::Int => Value::Int(self.reader.read_i32::<BigEndian>().map_err(Error::read)?),
            Tag::Long => Value::Long(self.reader.read_i64::<BigEndian>().map_err(Error::read)?),
            Tag::Float => Value::Float(self.reader.read_f32::<BigEndian>().map_err(Error::read)?),
            Tag::Double => {
                Value::Double(self.reader.read_f64::<BigEndian>().map_err(Error::read)?)
            }
            Tag::ByteArray => {
                let len = self.read_len()?;
                Value::ByteArray(self.read_bytes(len)?)
            }
            Tag::String => Value::String(self.read_size_prefixed_string()?),
            Tag::List => Value::List(self.read_list(schema)?),
            Tag::Compound => Value::Compound(self.read_compound(schema)?),
            Tag::IntArray => {
                let len = self.read_len()?;
                let size = len
                    .checked_mul(4)
                    .ok_or_else(|| Error::too_large("int array too large"))?;
                let bytes = self.read_bytes(size)?;
                Value::IntArray(
                    bytes
                        .chunks_exact(4)
                        .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                        .collect(),
                )
            }
        };

        // A number that does not fit the pinned width keeps its wire width.
        match schema.tag() {
            Some(target) if tag.is_numeric() && target != tag => {
                Ok(value.cast(target).unwrap_or(value))
            }
            _ => Ok(value),
        }
    }

    fn read_compound(&mut self, schema: &Schema) -> Result<Compound> {
        self.enter()?;

        let mut compound = Compound::new();
        loop {
            let tag = self.read_tag()?;
            if tag == Tag::End {
                break;
            }

            let name = self.read_size_prefixed_string()?;
            let child = schema.child(&name);
            let value = child
                .accepts(tag)
                .and_then(|_| self.read_payload(tag, child))
                .map_err(|e| Error::new(e.kind(), format!("{}: {}", name, e)))?;

            compound.insert(name, value);
        }

        self.depth -= 1;
        Ok(compound)
    }

    fn read_list(&mut self, schema: &Schema) -> Result<List> {
        self.enter()?;

        let element = self.read_tag()?;
        let len = self.read_len()?;
        let element_schema = schema.element();

        if element == Tag::End {
            if len > 0 {
                return Err(Error::new(
                    ErrorKind::UnknownTag,
                    format!("invalid nbt: list of {} end tags", len),
                ));
            }
            self.depth -= 1;
            return Ok(List::new(element_schema.tag().unwrap_or(Tag::End)));
        }

        element_schema.accepts(element)?;

        // Numbers are read at the wire width and the whole list is recast
        // afterwards, so a list is either converted entirely or not at all.
        let target = element_schema.tag().filter(|t| element.is_numeric() && *t != element);
        let payload_schema = if target.is_some() {
            &ANY
        } else {
            element_schema
        };

        let mut list = List::with_capacity(element, len.min(MAX_LIST_PREALLOC));
        for _ in 0..len {
            let value = self.read_payload(element, payload_schema)?;
            list.push(value)?;
        }

        self.depth -= 1;
        Ok(match target {
            Some(target) => list.cast(target).unwrap_or(list),
            None => list,
        })
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.reader.read_i32::<BigEndian>().map_err(Error::read)?;
        usize::try_from(len)
            .map_err(|_| Error::new(ErrorKind::Read, format!("invalid nbt: negative length {}", len)))
    }

    fn read_size_prefixed_string(&mut self) -> Result<String> {
        let len = self.reader.read_u16::<BigEndian>().map_err(Error::read)? as usize;
        let buf = self.read_bytes(len)?;

        String::from_utf8(buf).map_err(|e| Error::nonunicode_string(e.as_bytes()))
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.charge(len)?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(len)?;
        let read = self
            .reader
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(Error::read)?;

        if read < len {
            return Err(Error::unexpected_eof());
        }
        Ok(buf)
    }

    fn charge(&mut self, len: usize) -> Result<()> {
        if len > self.budget {
            return Err(Error::too_large(format!(
                "object of {} bytes exceeds the limit of {} bytes",
                len, self.limits.max_bytes
            )));
        }
        self.budget -= len;
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(Error::too_large(format!(
                "nesting exceeds the limit of {}",
                self.limits.max_depth
            )));
        }
        Ok(())
    }
}

/// Read a document from `reader`, returning the root name and value.
pub fn read_value<R: Read>(
    reader: R,
    schema: &Schema,
    options: &ReadOptions,
) -> Result<(String, Value)> {
    Deserializer::new(reader, options).read_root(schema)
}

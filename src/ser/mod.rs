//! Writing [`Value`] trees as binary NBT.
//!
//! Values already carry their exact tags, so writing cannot pick wrong
//! types. Choosing tags for loosely typed data happens beforehand, in
//! [`dynamic::to_value`][`crate::dynamic::to_value`].
//!
//! Some values have no representation in NBT, such as strings longer than
//! 65535 bytes. These result in an error (not a panic) before anything
//! about them is written.
mod write_nbt;

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::{Limits, Tag, Value, WriteOptions};

use self::write_nbt::WriteNbt;

/// Writes NBT documents to a writer, counting the bytes written.
pub struct Serializer<W: Write> {
    writer: W,
    limits: Limits,
    allow_fragments: bool,
    written: usize,
    depth: usize,
}

impl<W: Write> Serializer<W> {
    pub fn new(writer: W, options: &WriteOptions) -> Self {
        Self {
            writer,
            limits: options.limits,
            allow_fragments: options.allow_fragments,
            written: 0,
            depth: 0,
        }
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Consumes this serializer, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write `value` as a root tag named `name`. The root must be a compound
    /// unless fragments are allowed.
    pub fn write_root(&mut self, name: &str, value: &Value) -> Result<()> {
        if value.tag() != Tag::Compound && !self.allow_fragments {
            return Err(Error::wrong_type(Tag::Compound, value.tag()));
        }

        self.account(3 + name.len())?;
        self.writer.write_tag(value.tag())?;
        self.writer.write_size_prefixed_str(name)?;
        self.write_payload(value)
    }

    fn write_payload(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Byte(v) => {
                self.account(1)?;
                self.writer.write_i8(*v).map_err(Error::write)
            }
            Value::Short(v) => {
                self.account(2)?;
                self.writer.write_i16::<BigEndian>(*v).map_err(Error::write)
            }
            Value::Int(v) => {
                self.account(4)?;
                self.writer.write_i32::<BigEndian>(*v).map_err(Error::write)
            }
            Value::Long(v) => {
                self.account(8)?;
                self.writer.write_i64::<BigEndian>(*v).map_err(Error::write)
            }
            Value::Float(v) => {
                self.account(4)?;
                self.writer.write_f32::<BigEndian>(*v).map_err(Error::write)
            }
            Value::Double(v) => {
                self.account(8)?;
                self.writer.write_f64::<BigEndian>(*v).map_err(Error::write)
            }
            Value::ByteArray(bytes) => {
                self.account(4 + bytes.len())?;
                self.writer.write_len(bytes.len())?;
                self.writer.write_all(bytes).map_err(Error::write)
            }
            Value::String(s) => {
                self.account(2 + s.len())?;
                self.writer.write_size_prefixed_str(s)
            }
            Value::IntArray(ints) => {
                let size = ints
                    .len()
                    .checked_mul(4)
                    .ok_or_else(|| Error::too_large("int array too large"))?;
                self.account(4 + size)?;
                self.writer.write_len(ints.len())?;

                let mut payload = Vec::new();
                payload.try_reserve_exact(size)?;
                for i in ints {
                    payload.extend_from_slice(&i.to_be_bytes());
                }
                self.writer.write_all(&payload).map_err(Error::write)
            }
            Value::List(list) => {
                self.enter()?;
                self.account(5)?;
                self.writer.write_tag(list.element_tag())?;
                self.writer.write_len(list.len())?;
                for item in list {
                    self.write_payload(item)?;
                }
                self.depth -= 1;
                Ok(())
            }
            Value::Compound(compound) => {
                self.enter()?;
                for (name, child) in compound {
                    self.account(3 + name.len())?;
                    self.writer.write_tag(child.tag())?;
                    self.writer.write_size_prefixed_str(name)?;
                    self.write_payload(child)
                        .map_err(|e| Error::new(e.kind(), format!("{}: {}", name, e)))?;
                }
                self.account(1)?;
                self.writer.write_tag(Tag::End)?;
                self.depth -= 1;
                Ok(())
            }
        }
    }

    fn account(&mut self, len: usize) -> Result<()> {
        match self.written.checked_add(len) {
            Some(total) if total <= self.limits.max_bytes => {
                self.written = total;
                Ok(())
            }
            _ => Err(Error::too_large(format!(
                "output exceeds the limit of {} bytes",
                self.limits.max_bytes
            ))),
        }
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

/// Write a document to `writer`, returning the number of bytes written.
pub fn write_value<W: Write>(
    writer: W,
    name: &str,
    value: &Value,
    options: &WriteOptions,
) -> Result<usize> {
    let mut serializer = Serializer::new(writer, options);
    serializer.write_root(name, value)?;
    Ok(serializer.bytes_written())
}

/// Write a document to a new byte vector.
pub fn to_vec(name: &str, value: &Value, options: &WriteOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_value(&mut out, name, value, options)?;
    Ok(out)
}

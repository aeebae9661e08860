use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::Tag;

pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_u8(tag as u8).map_err(Error::write)
    }

    fn write_size_prefixed_str(&mut self, key: &str) -> Result<()> {
        let len = u16::try_from(key.len()).map_err(|_| {
            Error::too_large(format!("string of {} bytes is too long for nbt", key.len()))
        })?;
        self.write_u16::<BigEndian>(len).map_err(Error::write)?;
        self.write_all(key.as_bytes()).map_err(Error::write)
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| Error::too_large(format!("length {} is too large for nbt", len)))?;
        self.write_i32::<BigEndian>(len).map_err(Error::write)
    }
}

impl<T> WriteNbt for T where T: Write {}

use std::io::{self, BufReader, Read, Write};

use log::debug;

use crate::compress::{CompressionMode, Compressor, Decompressor};
use crate::de::Deserializer;
use crate::error::{Error, Result};
use crate::{dynamic, ser, DynValue, ReadOptions, Schema, Tag, Value, WriteOptions};

/// A decoded document.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: DynValue,
    /// Name of the root tag as read from the document.
    pub root_name: String,
}

/// Decode an uncompressed NBT document held in memory.
///
/// If `expected_root` is given, the root tag must have exactly that name or
/// decoding fails with [`ErrorKind::WrongRootName`][`crate::error::ErrorKind::WrongRootName`].
/// The name is only checked once the whole document has been decoded. The
/// name actually read is always returned in [`Decoded::root_name`].
///
/// With a schema, the document must have the structure the schema describes,
/// and numbers come back plain at the positions it pins. All other numbers
/// are tagged with the width they were stored with.
pub fn from_bytes(
    data: &[u8],
    expected_root: Option<&str>,
    options: &ReadOptions,
    schema: Option<&Schema>,
) -> Result<Decoded> {
    debug!("decoding {} bytes", data.len());
    decode(data, expected_root, options, schema).map(|(decoded, _)| decoded)
}

/// Decode an NBT document from a reader, optionally decompressing it first.
///
/// With a compression mode, the whole compressed stream is consumed so that
/// its checksum is verified, even though decoding stops at the end of the
/// root tag. See [`from_bytes`] for the remaining parameters.
///
/// ```no_run
/// use nbtcodec::{from_reader, CompressionMode, ReadOptions};
///
/// let file = std::fs::File::open("level.dat").unwrap();
/// let level = from_reader(file, Some(CompressionMode::GZip), None, &ReadOptions::default(), None).unwrap();
/// println!("{}: {:?}", level.root_name, level.value.get("Data"));
/// ```
pub fn from_reader<R: Read>(
    reader: R,
    compression: Option<CompressionMode>,
    expected_root: Option<&str>,
    options: &ReadOptions,
    schema: Option<&Schema>,
) -> Result<Decoded> {
    match compression {
        None => decode(BufReader::new(reader), expected_root, options, schema)
            .map(|(decoded, _)| decoded),
        Some(mode) => {
            debug!("decoding {:?} compressed stream", mode);
            let decompressor = Decompressor::new(reader, mode)?;
            let (decoded, mut decompressor) = decode(decompressor, expected_root, options, schema)?;

            io::copy(&mut decompressor, &mut io::sink()).map_err(Error::read)?;
            debug!(
                "inflated {} bytes from {}",
                decompressor.raw_bytes_read(),
                decompressor.compressed_bytes_read()
            );
            Ok(decoded)
        }
    }
}

/// Encode a document as uncompressed NBT.
///
/// Tags are chosen as described in [`dynamic::to_value`]: numbers that
/// remember a width keep it, the schema pins the rest, and anything left
/// over gets the smallest type that holds it. The root must be a map unless
/// fragments are allowed.
pub fn to_bytes(
    value: &DynValue,
    root_name: &str,
    options: &WriteOptions,
    schema: Option<&Schema>,
) -> Result<Vec<u8>> {
    let tree = resolve(value, schema)?;
    let bytes = ser::to_vec(root_name, &tree, options)?;
    debug!("encoded {} bytes", bytes.len());
    Ok(bytes)
}

/// Encode a document into a writer, optionally compressing it. Returns the
/// number of bytes handed to `writer`.
///
/// The document is fully encoded in memory first, so an error of any kind,
/// including [`ErrorKind::ObjectTooLarge`][`crate::error::ErrorKind::ObjectTooLarge`],
/// leaves `writer` untouched. Only failures of `writer` itself can leave
/// partial output behind.
pub fn to_writer<W: Write>(
    mut writer: W,
    value: &DynValue,
    root_name: &str,
    compression: Option<CompressionMode>,
    options: &WriteOptions,
    schema: Option<&Schema>,
) -> Result<usize> {
    let tree = resolve(value, schema)?;
    let bytes = ser::to_vec(root_name, &tree, options)?;

    let written = match compression {
        None => {
            writer.write_all(&bytes).map_err(Error::write)?;
            writer.flush().map_err(Error::write)?;
            bytes.len()
        }
        Some(mode) => {
            let mut compressor = Compressor::new(writer, mode)?;
            compressor.write_all(&bytes).map_err(Error::write)?;
            let (_, written) = compressor.finish_counted()?;
            debug!("compressed {} bytes into {} with {:?}", bytes.len(), written, mode);
            written as usize
        }
    };

    Ok(written)
}

/// Whether `value` could be encoded, conforming to `schema` if one is given.
pub fn is_valid(value: &DynValue, schema: Option<&Schema>) -> bool {
    matches!(resolve(value, schema), Ok(tree) if tree.tag() == Tag::Compound)
}

fn resolve(value: &DynValue, schema: Option<&Schema>) -> Result<Value> {
    let any = Schema::Any;
    dynamic::to_value(value, schema.unwrap_or(&any))
}

fn decode<R: Read>(
    reader: R,
    expected_root: Option<&str>,
    options: &ReadOptions,
    schema: Option<&Schema>,
) -> Result<(Decoded, R)> {
    let any = Schema::Any;
    let schema = schema.unwrap_or(&any);

    let mut deserializer = Deserializer::new(reader, options);
    let (root_name, value) = deserializer.read_root(schema)?;

    if let Some(expected) = expected_root {
        if expected != root_name {
            return Err(Error::wrong_root_name(expected, &root_name));
        }
    }

    let decoded = Decoded {
        value: dynamic::from_value(value, schema),
        root_name,
    };
    Ok((decoded, deserializer.into_inner()))
}

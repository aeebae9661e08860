//! Streaming deflate compression with raw, zlib or gzip framing.
//!
//! [`Compressor`] wraps a writer, [`Decompressor`] wraps a reader. Both work
//! incrementally, so a document can be parsed while it is being inflated
//! without holding the whole decompressed payload in memory.
//!
//! ```
//! use std::io::{Read, Write};
//! use nbtcodec::compress::{Compressor, Decompressor, CompressionMode};
//!
//! # fn main() -> nbtcodec::error::Result<()> {
//! let mut compressor = Compressor::new(Vec::new(), CompressionMode::GZip)?;
//! compressor.write_all(b"hello hello hello").unwrap();
//! let compressed = compressor.finish()?;
//!
//! let decompressor = Decompressor::new(compressed.as_slice(), CompressionMode::AutoDetect)?;
//! assert_eq!(decompressor.read_until_end()?, b"hello hello hello");
//! # Ok(())
//! # }
//! ```
use std::fmt;
use std::io::{self, BufRead, BufReader, Chain, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::{Compression, Crc, Decompress, FlushDecompress, Status};
use log::{debug, trace};

use crate::error::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const DEFLATE_METHOD: u8 = 8;

const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;
const FRESERVED: u8 = 0xe0;

/// Framing of a deflate stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Bare deflate data, no header or trailer.
    RawDeflate,
    /// Two byte header and Adler-32 trailer. Used for region file chunks.
    ZLib,
    /// Gzip header, CRC-32 and size trailer. Used for most NBT files.
    GZip,
    /// Gzip or zlib, decided by the first bytes. Only valid for reading.
    AutoDetect,
}

/// A compression failure carried inside an `io::Error`, so that it can pass
/// through `Read`/`Write` based code and be told apart from errors of the
/// underlying stream afterwards.
#[derive(Debug)]
pub(crate) struct CompressionFault(String);

impl fmt::Display for CompressionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CompressionFault {}

fn fault(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, CompressionFault(msg.into()))
}

/// Counts bytes passing through a reader or writer.
#[derive(Debug)]
struct Counting<T> {
    inner: T,
    count: u64,
}

impl<T> Counting<T> {
    fn new(inner: T) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: Read> Read for Counting<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

enum Encoder<W: Write> {
    Raw(DeflateEncoder<W>),
    Zlib(ZlibEncoder<W>),
    Gzip(GzEncoder<W>),
}

/// Compresses everything written to it into the wrapped writer. Call
/// [`finish`][`Compressor::finish`] to write the trailer; dropping the
/// compressor instead attempts to finish and ignores errors.
pub struct Compressor<W: Write> {
    encoder: Encoder<Counting<W>>,
    raw: u64,
}

impl<W: Write> Compressor<W> {
    pub fn new(writer: W, mode: CompressionMode) -> Result<Self> {
        Self::with_level(writer, mode, Compression::default())
    }

    pub fn with_level(writer: W, mode: CompressionMode, level: Compression) -> Result<Self> {
        let writer = Counting::new(writer);
        let encoder = match mode {
            CompressionMode::RawDeflate => Encoder::Raw(DeflateEncoder::new(writer, level)),
            CompressionMode::ZLib => Encoder::Zlib(ZlibEncoder::new(writer, level)),
            CompressionMode::GZip => Encoder::Gzip(GzEncoder::new(writer, level)),
            CompressionMode::AutoDetect => {
                return Err(Error::compression(
                    "auto-detect is only valid for decompression",
                ))
            }
        };

        Ok(Self { encoder, raw: 0 })
    }

    /// Uncompressed bytes accepted so far.
    pub fn raw_bytes_written(&self) -> u64 {
        self.raw
    }

    /// Compressed bytes handed to the underlying writer so far.
    pub fn compressed_bytes_written(&self) -> u64 {
        match &self.encoder {
            Encoder::Raw(e) => e.get_ref().count,
            Encoder::Zlib(e) => e.get_ref().count,
            Encoder::Gzip(e) => e.get_ref().count,
        }
    }

    /// Flush remaining data and the trailer, returning the inner writer.
    pub fn finish(self) -> Result<W> {
        self.finish_counted().map(|(writer, _)| writer)
    }

    /// Like [`finish`][`Compressor::finish`], also returning the total count
    /// of compressed bytes written.
    pub(crate) fn finish_counted(self) -> Result<(W, u64)> {
        let counting = match self.encoder {
            Encoder::Raw(e) => e.finish(),
            Encoder::Zlib(e) => e.finish(),
            Encoder::Gzip(e) => e.finish(),
        }
        .map_err(Error::write)?;

        Ok((counting.inner, counting.count))
    }
}

impl<W: Write> Write for Compressor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match &mut self.encoder {
            Encoder::Raw(e) => e.write(buf),
            Encoder::Zlib(e) => e.write(buf),
            Encoder::Gzip(e) => e.write(buf),
        }?;
        self.raw += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.encoder {
            Encoder::Raw(e) => e.flush(),
            Encoder::Zlib(e) => e.flush(),
            Encoder::Gzip(e) => e.flush(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    Raw,
    Zlib,
    Gzip,
}

fn detect(magic: [u8; 2]) -> Result<Framing> {
    if magic == GZIP_MAGIC {
        Ok(Framing::Gzip)
    } else if magic[0] & 0x0f == DEFLATE_METHOD {
        Ok(Framing::Zlib)
    } else {
        Err(Error::compression(format!(
            "unrecognised compression header: {:02x} {:02x}",
            magic[0], magic[1]
        )))
    }
}

// The header is read before any data, so running out here means the stream
// is not compressed data at all.
fn header_error(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::compression("truncated compression header")
    } else {
        Error::read(e)
    }
}

type Source<R> = BufReader<Chain<Cursor<Vec<u8>>, Counting<R>>>;

/// Inflates a compressed stream as it is read.
///
/// Reading fails with a compression error if the stream is corrupt, fails
/// its checksum, or ends before the end of the deflate data.
pub struct Decompressor<R: Read> {
    source: Source<R>,
    inflate: Decompress,
    crc: Option<Crc>,
    finished: bool,
}

impl<R: Read> Decompressor<R> {
    /// Wrap `reader`, reading and checking the stream header straight away.
    pub fn new(reader: R, mode: CompressionMode) -> Result<Self> {
        let mut reader = Counting::new(reader);

        let (framing, prefix) = match mode {
            CompressionMode::RawDeflate => (Framing::Raw, vec![]),
            CompressionMode::ZLib => (Framing::Zlib, vec![]),
            CompressionMode::GZip => (Framing::Gzip, vec![]),
            CompressionMode::AutoDetect => {
                let mut magic = [0u8; 2];
                reader.read_exact(&mut magic).map_err(header_error)?;
                let framing = detect(magic)?;
                debug!("detected {:?} framing", framing);
                (framing, magic.to_vec())
            }
        };

        let mut source = BufReader::new(Cursor::new(prefix).chain(reader));
        if framing == Framing::Gzip {
            read_gzip_header(&mut source)?;
        }

        Ok(Self {
            source,
            inflate: Decompress::new(framing == Framing::Zlib),
            crc: (framing == Framing::Gzip).then(Crc::new),
            finished: false,
        })
    }

    /// Bytes pulled from the underlying reader so far.
    pub fn compressed_bytes_read(&self) -> u64 {
        self.source.get_ref().get_ref().1.count
    }

    /// Decompressed bytes produced so far.
    pub fn raw_bytes_read(&self) -> u64 {
        self.inflate.total_out()
    }

    /// Read until the end of the compressed data, returning everything
    /// recovered.
    pub fn read_until_end(mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        Read::read_to_end(&mut self, &mut out).map_err(Error::read)?;
        Ok(out)
    }

    fn finish_stream(&mut self) -> io::Result<()> {
        self.finished = true;

        if let Some(crc) = &self.crc {
            let expected_crc = self.source.read_u32::<LittleEndian>().map_err(trailer_fault)?;
            let expected_size = self.source.read_u32::<LittleEndian>().map_err(trailer_fault)?;

            trace!(
                "gzip trailer: crc {:08x}/{:08x}, size {}/{}",
                expected_crc,
                crc.sum(),
                expected_size,
                crc.amount()
            );

            if expected_crc != crc.sum() {
                return Err(fault("gzip checksum mismatch"));
            }
            if expected_size != crc.amount() {
                return Err(fault("gzip size mismatch"));
            }
        }

        Ok(())
    }
}

fn trailer_fault(e: io::Error) -> io::Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        fault("truncated gzip trailer")
    } else {
        e
    }
}

impl<R: Read> Read for Decompressor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }

        loop {
            let input = self.source.fill_buf()?;
            let eof = input.is_empty();
            let flush = if eof {
                FlushDecompress::Finish
            } else {
                FlushDecompress::None
            };

            let before_in = self.inflate.total_in();
            let before_out = self.inflate.total_out();
            let status = self
                .inflate
                .decompress(input, buf, flush)
                .map_err(|e| fault(format!("corrupt deflate stream: {}", e)))?;
            let consumed = (self.inflate.total_in() - before_in) as usize;
            let produced = (self.inflate.total_out() - before_out) as usize;

            self.source.consume(consumed);
            if let Some(crc) = &mut self.crc {
                crc.update(&buf[..produced]);
            }

            match status {
                Status::StreamEnd => {
                    self.finish_stream()?;
                    return Ok(produced);
                }
                _ if produced > 0 => return Ok(produced),
                _ if eof => return Err(fault("truncated deflate stream")),
                _ => {}
            }
        }
    }
}

fn read_gzip_header<R: BufRead>(source: &mut R) -> Result<()> {
    let mut header = [0u8; 10];
    source.read_exact(&mut header).map_err(header_error)?;

    if header[..2] != GZIP_MAGIC {
        return Err(Error::compression("not a gzip stream"));
    }
    if header[2] != DEFLATE_METHOD {
        return Err(Error::compression(format!(
            "unsupported gzip compression method: {}",
            header[2]
        )));
    }

    let flags = header[3];
    if flags & FRESERVED != 0 {
        return Err(Error::compression(format!(
            "unsupported gzip flags: {:02x}",
            flags
        )));
    }

    if flags & FEXTRA != 0 {
        let len = source.read_u16::<LittleEndian>().map_err(header_error)?;
        skip(source, len as u64)?;
    }
    if flags & FNAME != 0 {
        skip_zero_terminated(source)?;
    }
    if flags & FCOMMENT != 0 {
        skip_zero_terminated(source)?;
    }
    if flags & FHCRC != 0 {
        skip(source, 2)?;
    }

    Ok(())
}

fn skip<R: Read>(source: &mut R, len: u64) -> Result<()> {
    let skipped = io::copy(&mut source.by_ref().take(len), &mut io::sink()).map_err(header_error)?;
    if skipped != len {
        return Err(Error::compression("truncated compression header"));
    }
    Ok(())
}

fn skip_zero_terminated<R: BufRead>(source: &mut R) -> Result<()> {
    let mut field = Vec::new();
    source.read_until(0, &mut field).map_err(header_error)?;
    if field.last() != Some(&0) {
        return Err(Error::compression("truncated compression header"));
    }
    Ok(())
}

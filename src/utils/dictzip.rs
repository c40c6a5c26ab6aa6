//! Random access to dictzip (`.dict.dz`) files.
//!
//! A dictzip file is an ordinary gzip member whose header carries an `RA`
//! extra subfield. The uncompressed data is cut into fixed-length chunks, each
//! deflated up to a full flush point, so every chunk can be inflated on its own:
//!
//! ```text
//! +---+---+---+---+---+---+---+---+
//! |'R'|'A'| LEN   | VER=1 | CHLEN |   all u16, little-endian
//! +---+---+---+---+---+---+---+---+
//! | CHCNT | size of chunk 0 | ... |   CHCNT compressed chunk sizes
//! +---+---+---+---+---+---+---+---+
//! ```
//!
//! [`DictzipReader`] implements `Read + Seek` over the *decompressed* stream and
//! inflates only the chunks a read touches. [`write_dictzip`] produces such files.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::{Compress, Compression, Crc, Decompress, FlushCompress, FlushDecompress, Status};

use crate::{Result, StardictError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const CM_DEFLATE: u8 = 8;
const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;
const RA_ID: [u8; 2] = *b"RA";
const RA_VERSION: u16 = 1;
const OS_UNIX: u8 = 3;
const XFL_BEST: u8 = 2;

/// Chunk length used by the reference `dictzip` tool; it keeps the worst-case
/// deflated chunk below 64 KiB.
pub const DEFAULT_CHUNK_LEN: usize = 58315;

/// Most chunks an `RA` subfield can describe within the 64 KiB extra field.
pub const MAX_CHUNK_COUNT: usize = (u16::MAX as usize - 10) / 2;

/// Suffix marking a dictzip-compressed definitions file.
pub const DICTZIP_SUFFIX: &str = ".dz";

/// Checks whether a path names a dictzip file by its suffix.
pub fn is_dictzip_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(DICTZIP_SUFFIX))
}

fn eof_as_invalid(e: io::Error) -> StardictError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        StardictError::invalid_data_format("Truncated dictzip header")
    } else {
        e.into()
    }
}

/// Chunk table decoded from a dictzip header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictzipHeader {
    /// Uncompressed length of every chunk but the last.
    pub chunk_len: u32,
    /// File offsets of each chunk's compressed data, followed by the end offset
    /// of the last chunk.
    chunk_offsets: Vec<u64>,
    /// Total length of the decompressed stream.
    pub uncompressed_len: u64,
}

impl DictzipHeader {
    /// Reads the gzip header and trailer of a dictzip file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDataFormat` if the data is not gzip, is not deflate
    /// compressed, or carries no `RA` subfield.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let mut fixed = [0u8; 10];
        reader.read_exact(&mut fixed).map_err(eof_as_invalid)?;
        if fixed[0..2] != GZIP_MAGIC {
            return Err(StardictError::invalid_data_format("Not a gzip file: bad magic"));
        }
        if fixed[2] != CM_DEFLATE {
            return Err(StardictError::invalid_data_format(format!(
                "Unsupported gzip compression method: {}",
                fixed[2]
            )));
        }
        let flags = fixed[3];
        if flags & FEXTRA == 0 {
            return Err(StardictError::invalid_data_format("Not a dictzip file: no extra field"));
        }

        let xlen = reader.read_u16::<LittleEndian>().map_err(eof_as_invalid)?;
        let mut extra = vec![0u8; xlen as usize];
        reader.read_exact(&mut extra).map_err(eof_as_invalid)?;
        let (chunk_len, chunk_sizes) = parse_ra_subfield(&extra)?;

        if flags & FNAME != 0 {
            skip_cstr(reader)?;
        }
        if flags & FCOMMENT != 0 {
            skip_cstr(reader)?;
        }
        if flags & FHCRC != 0 {
            reader.read_u16::<LittleEndian>().map_err(eof_as_invalid)?;
        }

        let data_start = reader.stream_position()?;
        let mut chunk_offsets = Vec::with_capacity(chunk_sizes.len() + 1);
        let mut offset = data_start;
        chunk_offsets.push(offset);
        for size in &chunk_sizes {
            offset += u64::from(*size);
            chunk_offsets.push(offset);
        }

        // Trailer: CRC32 then ISIZE, both little-endian
        let file_len = reader.seek(SeekFrom::End(0))?;
        if file_len < offset + 8 {
            return Err(StardictError::invalid_data_format(format!(
                "Dictzip chunks end at {} but file is {} bytes",
                offset, file_len
            )));
        }
        reader.seek(SeekFrom::End(-4))?;
        let uncompressed_len = u64::from(reader.read_u32::<LittleEndian>()?);

        Ok(Self { chunk_len: u32::from(chunk_len), chunk_offsets, uncompressed_len })
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_offsets.len().saturating_sub(1)
    }

    /// File byte range holding the compressed data of chunk `index`.
    pub fn chunk_range(&self, index: usize) -> Option<(u64, u64)> {
        let start = *self.chunk_offsets.get(index)?;
        let end = *self.chunk_offsets.get(index + 1)?;
        Some((start, end))
    }
}

fn parse_ra_subfield(mut extra: &[u8]) -> Result<(u16, Vec<u16>)> {
    while extra.len() >= 4 {
        let id = [extra[0], extra[1]];
        let len = u16::from_le_bytes([extra[2], extra[3]]) as usize;
        extra = &extra[4..];
        if extra.len() < len {
            return Err(StardictError::invalid_data_format("Gzip extra subfield overruns extra field"));
        }
        let (mut data, rest) = extra.split_at(len);
        extra = rest;
        if id != RA_ID {
            continue;
        }

        let version = data.read_u16::<LittleEndian>().map_err(eof_as_invalid)?;
        if version != RA_VERSION {
            return Err(StardictError::invalid_data_format(format!(
                "Unsupported dictzip version: {}",
                version
            )));
        }
        let chunk_len = data.read_u16::<LittleEndian>().map_err(eof_as_invalid)?;
        let chunk_count = data.read_u16::<LittleEndian>().map_err(eof_as_invalid)?;
        if chunk_len == 0 {
            return Err(StardictError::invalid_data_format("Dictzip chunk length is zero"));
        }
        let mut sizes = Vec::with_capacity(chunk_count as usize);
        for _ in 0..chunk_count {
            sizes.push(data.read_u16::<LittleEndian>().map_err(eof_as_invalid)?);
        }
        return Ok((chunk_len, sizes));
    }
    Err(StardictError::invalid_data_format("Not a dictzip file: no RA subfield"))
}

fn skip_cstr<R: Read>(reader: &mut R) -> Result<()> {
    while reader.read_u8().map_err(eof_as_invalid)? != 0 {}
    Ok(())
}

/// Seekable reader over the decompressed content of a dictzip file.
///
/// The most recently inflated chunk is kept, so sequential reads inside one
/// chunk inflate it once.
pub struct DictzipReader<R: Read + Seek> {
    inner: R,
    header: DictzipHeader,
    position: u64,
    cached_index: Option<usize>,
    cache: Vec<u8>,
}

impl<R: Read + Seek> DictzipReader<R> {
    /// Wraps a reader positioned anywhere in a dictzip file.
    pub fn new(mut inner: R) -> Result<Self> {
        let header = DictzipHeader::from_reader(&mut inner)?;
        Ok(Self { inner, header, position: 0, cached_index: None, cache: Vec::new() })
    }

    /// Length of the decompressed stream.
    pub fn len(&self) -> u64 {
        self.header.uncompressed_len
    }

    pub fn is_empty(&self) -> bool {
        self.header.uncompressed_len == 0
    }

    fn load_chunk(&mut self, index: usize) -> Result<()> {
        if self.cached_index == Some(index) {
            return Ok(());
        }
        let (start, end) = self.header.chunk_range(index).ok_or_else(|| {
            StardictError::invalid_data_format(format!("Dictzip chunk {} out of range", index))
        })?;
        self.inner.seek(SeekFrom::Start(start))?;
        let mut compressed = vec![0u8; (end - start) as usize];
        self.inner.read_exact(&mut compressed)?;

        // One byte of headroom so an oversized chunk shows up instead of being cut
        let chunk_len = self.header.chunk_len as usize;
        let mut inflater = Decompress::new(false);
        let mut chunk = Vec::with_capacity(chunk_len + 1);
        inflater
            .decompress_vec(&compressed, &mut chunk, FlushDecompress::Sync)
            .map_err(|e| StardictError::decompression_error(format!("Dictzip chunk {}: {}", index, e)))?;
        if chunk.len() > chunk_len {
            return Err(StardictError::decompression_error(format!(
                "Dictzip chunk {} inflates to more than chunk length {}",
                index, chunk_len
            )));
        }
        let is_last = index + 1 == self.header.chunk_count();
        if !is_last && chunk.len() < chunk_len {
            return Err(StardictError::decompression_error(format!(
                "Dictzip chunk {} inflated to {} bytes, expected {}",
                index,
                chunk.len(),
                chunk_len
            )));
        }

        self.cached_index = Some(index);
        self.cache = chunk;
        Ok(())
    }
}

impl<R: Read + Seek> Read for DictzipReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.position >= self.header.uncompressed_len {
            return Ok(0);
        }
        let chunk_len = u64::from(self.header.chunk_len);
        let index = (self.position / chunk_len) as usize;
        if index >= self.header.chunk_count() {
            return Ok(0);
        }
        self.load_chunk(index)?;

        let within = (self.position % chunk_len) as usize;
        let Some(available) = self.cache.get(within..) else {
            return Ok(0);
        };
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.position += n as u64;
        Ok(n)
    }
}

impl<R: Read + Seek> Seek for DictzipReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
            SeekFrom::End(delta) => self.header.uncompressed_len.checked_add_signed(delta),
        };
        match target {
            Some(position) => {
                self.position = position;
                Ok(position)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}

fn deflate_chunk(compress: &mut Compress, mut input: &[u8], flush: FlushCompress) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len() + 64);
    loop {
        let before = compress.total_in();
        let status = compress
            .compress_vec(input, &mut out, flush)
            .map_err(|e| StardictError::compression_error(format!("Deflate error: {}", e)))?;
        let consumed = (compress.total_in() - before) as usize;
        input = &input[consumed..];
        let done = match status {
            Status::StreamEnd => true,
            // Flush is complete once deflate stops filling the output buffer
            Status::Ok | Status::BufError => input.is_empty() && out.len() < out.capacity(),
        };
        if done {
            return Ok(out);
        }
        out.reserve(out.capacity().max(64));
    }
}

/// Compresses `data` into dictzip format.
///
/// # Errors
///
/// Returns `InvalidParameter` if `chunk_len` is zero or above `u16::MAX`, or if
/// `data` would need more than [`MAX_CHUNK_COUNT`] chunks, and a
/// `CompressionError` if a chunk deflates to more than 64 KiB.
pub fn write_dictzip<W: Write>(data: &[u8], chunk_len: usize, mut writer: W) -> Result<()> {
    if chunk_len == 0 || chunk_len > u16::MAX as usize {
        return Err(StardictError::invalid_parameter(format!("Invalid dictzip chunk length: {}", chunk_len)));
    }
    let mut chunks: Vec<&[u8]> = data.chunks(chunk_len).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }
    if chunks.len() > MAX_CHUNK_COUNT {
        return Err(StardictError::invalid_parameter(format!(
            "{} bytes need {} dictzip chunks of {} bytes, at most {} fit",
            data.len(),
            chunks.len(),
            chunk_len,
            MAX_CHUNK_COUNT
        )));
    }

    let mut compress = Compress::new(Compression::best(), false);
    let mut compressed = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let flush = if i + 1 == chunks.len() { FlushCompress::Finish } else { FlushCompress::Full };
        let deflated = deflate_chunk(&mut compress, chunk, flush)?;
        if deflated.len() > u16::MAX as usize {
            return Err(StardictError::compression_error(format!(
                "Dictzip chunk {} deflated to {} bytes",
                i,
                deflated.len()
            )));
        }
        compressed.push(deflated);
    }

    let ra_len = 6 + 2 * compressed.len();
    writer.write_all(&GZIP_MAGIC)?;
    writer.write_u8(CM_DEFLATE)?;
    writer.write_u8(FEXTRA)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u8(XFL_BEST)?;
    writer.write_u8(OS_UNIX)?;
    writer.write_u16::<LittleEndian>((4 + ra_len) as u16)?;
    writer.write_all(&RA_ID)?;
    writer.write_u16::<LittleEndian>(ra_len as u16)?;
    writer.write_u16::<LittleEndian>(RA_VERSION)?;
    writer.write_u16::<LittleEndian>(chunk_len as u16)?;
    writer.write_u16::<LittleEndian>(compressed.len() as u16)?;
    for deflated in &compressed {
        writer.write_u16::<LittleEndian>(deflated.len() as u16)?;
    }
    for deflated in &compressed {
        writer.write_all(deflated)?;
    }

    let mut crc = Crc::new();
    crc.update(data);
    writer.write_u32::<LittleEndian>(crc.sum())?;
    writer.write_u32::<LittleEndian>(data.len() as u32)?;
    writer.flush()?;
    Ok(())
}

//! Definitions blob (`.dict` / `.dict.dz`) access.
//!
//! The blob has no structure of its own: definitions are addressed purely by the
//! `(offset, size)` pairs stored in the index. A plain `.dict` file is read
//! directly; a `.dict.dz` file goes through [`DictzipReader`], which seeks in the
//! decompressed stream. Either way the source is opened per read and dropped
//! before returning.
//!
//! `sametypesequence` type markers are not interpreted; bytes come back raw.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::utils::diagnostics::DiagnosticSink;
use crate::utils::dictzip::{is_dictzip_path, DictzipReader};
use crate::utils::io_utils::open_if_exists;
use crate::Result;

/// Upper bound on the buffer reserved ahead of a read; sizes come from the index
/// and are not trusted for allocation.
const MAX_PREALLOC: u32 = 1 << 20;

/// A seekable byte source over the uncompressed definitions.
pub trait DefinitionSource: Read + Seek {}

impl<T: Read + Seek> DefinitionSource for T {}

/// How the definitions blob is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictFormat {
    /// Uncompressed `.dict`
    Plain,
    /// Dictzip compressed `.dict.dz`
    Dictzip,
}

impl DictFormat {
    /// Picks the format from the file name suffix.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        if is_dictzip_path(path) {
            DictFormat::Dictzip
        } else {
            DictFormat::Plain
        }
    }

    /// Extension appended to a bundle's base name for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            DictFormat::Plain => "dict",
            DictFormat::Dictzip => "dict.dz",
        }
    }
}

/// Opens the definitions blob, or returns `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, or for [`DictFormat::Dictzip`]
/// if its header is invalid.
pub fn open_definitions<P: AsRef<Path>>(path: P, format: DictFormat) -> Result<Option<Box<dyn DefinitionSource>>> {
    let Some(reader) = open_if_exists(path)? else {
        return Ok(None);
    };
    let source: Box<dyn DefinitionSource> = match format {
        DictFormat::Plain => Box::new(reader),
        DictFormat::Dictzip => Box::new(DictzipReader::new(reader)?),
    };
    Ok(Some(source))
}

/// Reads up to `size` bytes at `offset` from an open source.
///
/// Returns fewer bytes when the source ends first.
pub fn read_span<S: DefinitionSource + ?Sized>(source: &mut S, offset: u32, size: u32) -> Result<Vec<u8>> {
    source.seek(SeekFrom::Start(u64::from(offset)))?;
    let mut data = Vec::with_capacity(size.min(MAX_PREALLOC) as usize);
    Read::take(&mut *source, u64::from(size)).read_to_end(&mut data)?;
    Ok(data)
}

/// Reads a definition from a blob stored in `format`.
///
/// Returns `Ok(None)` if the blob file does not exist. A blob shorter than
/// `offset + size` yields the bytes that are there; the shortfall is reported to
/// `diag`.
pub fn read_definition_with<P: AsRef<Path>>(
    path: P,
    format: DictFormat,
    offset: u32,
    size: u32,
    diag: &dyn DiagnosticSink,
) -> Result<Option<Vec<u8>>> {
    let path = path.as_ref();
    let Some(mut source) = open_definitions(path, format)? else {
        diag.info(&format!("dict file not found: {}", path.display()));
        return Ok(None);
    };
    let data = read_span(source.as_mut(), offset, size)?;
    if data.len() < size as usize {
        diag.info(&format!(
            "Short read from '{}': wanted {} bytes at offset {}, got {}",
            path.display(),
            size,
            offset,
            data.len()
        ));
    }
    Ok(Some(data))
}

/// Reads a definition, choosing plain or dictzip access from the file suffix.
pub fn read_definition<P: AsRef<Path>>(
    path: P,
    offset: u32,
    size: u32,
    diag: &dyn DiagnosticSink,
) -> Result<Option<Vec<u8>>> {
    let format = DictFormat::from_path(&path);
    read_definition_with(path, format, offset, size, diag)
}

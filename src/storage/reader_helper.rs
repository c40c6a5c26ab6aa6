//! Helper functions for reading StarDict binary records.
//!
//! Index and synonym files share one record shape: a UTF-8 string terminated by
//! a zero byte, followed by fixed-width big-endian integers.

use std::io::{self, BufRead};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::Component;
use crate::{Result, StardictError};

/// Strips a single trailing zero byte, if present.
pub fn bytes_from_cstr(cstr: &[u8]) -> &[u8] {
    match cstr.split_last() {
        Some((0, rest)) => rest,
        _ => cstr,
    }
}

/// Sequential reader over `(cstring)(u32 BE)*` records, tracking byte position
/// so truncation errors can point at the record that failed.
pub struct RecordReader<R: BufRead> {
    reader: R,
    component: Component,
    position: u64,
    record_start: u64,
    trailing: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R, component: Component) -> Self {
        Self { reader, component, position: 0, record_start: 0, trailing: 0 }
    }

    /// Reads the next zero-terminated word.
    ///
    /// Returns `Ok(None)` at end of file. Bytes left over after the last
    /// terminator do not form a record; they are counted in
    /// [`trailing_bytes`](Self::trailing_bytes) and otherwise ignored.
    pub fn next_word(&mut self) -> Result<Option<String>> {
        self.record_start = self.position;
        let mut buf = Vec::new();
        let n = self.reader.read_until(0, &mut buf)?;
        self.position += n as u64;
        if n == 0 {
            return Ok(None);
        }
        if buf.last() != Some(&0) {
            self.trailing = n;
            return Ok(None);
        }
        let word = String::from_utf8(bytes_from_cstr(&buf).to_vec()).map_err(|e| {
            StardictError::invalid_data_format(format!(
                "Invalid UTF-8 in {} word at byte {}: {}",
                self.component, self.record_start, e
            ))
        })?;
        Ok(Some(word))
    }

    /// Length of the unterminated fragment found at end of file, if any.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    /// Reads one big-endian u32 belonging to the current record.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        match self.reader.read_u32::<BigEndian>() {
            Ok(value) => {
                self.position += 4;
                Ok(value)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(StardictError::truncated_record(self.component, self.record_start))
            }
            Err(e) => Err(e.into()),
        }
    }
}

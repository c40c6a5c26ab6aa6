//! Word index (`.idx`) parsing.
//!
//! The index is a tight repetition of records, sorted by word:
//!
//! ```text
//! word_str          // UTF-8, terminated by '\0'
//! word_data_offset  // u32, network byte order, offset into the definitions blob
//! word_data_size    // u32, network byte order, length of the definition
//! ```
//!
//! Sort order is not re-validated. Only 32-bit offsets are supported.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::Component;
use crate::storage::reader_helper::RecordReader;
use crate::utils::diagnostics::DiagnosticSink;
use crate::utils::io_utils::open_if_exists;
use crate::Result;

/// Location of one definition inside the definitions blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataLocation {
    pub offset: u32,
    pub size: u32,
}

impl DataLocation {
    pub fn new(offset: u32, size: u32) -> Self {
        Self { offset, size }
    }
}

/// Parsed word index.
///
/// `entries` holds every record's location in file order, so a position in the
/// index's word order addresses the same record regardless of its word. The
/// word map keeps the last location seen for a repeated word.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordIndex {
    words: HashMap<String, DataLocation>,
    entries: Vec<DataLocation>,
}

impl WordIndex {
    /// Looks up a word's location.
    pub fn get(&self, word: &str) -> Option<DataLocation> {
        self.words.get(word).copied()
    }

    /// Returns the location of the record at `position` in file order.
    pub fn at(&self, position: u32) -> Option<DataLocation> {
        self.entries.get(position as usize).copied()
    }

    /// Number of records, counting repeated words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Word to location mapping.
    pub fn words(&self) -> &HashMap<String, DataLocation> {
        &self.words
    }

    /// Locations in file order.
    pub fn entries(&self) -> &[DataLocation] {
        &self.entries
    }

    fn push(&mut self, word: String, location: DataLocation) {
        self.entries.push(location);
        self.words.insert(word, location);
    }
}

/// Parses the index file at `path`. An absent file yields an empty index.
///
/// # Errors
///
/// Returns [`crate::StardictError::TruncatedRecord`] if a record ends before its
/// eight offset/size bytes, and `InvalidDataFormat` for a word that is not UTF-8.
pub fn parse_index<P: AsRef<Path>>(path: P, diag: &dyn DiagnosticSink) -> Result<WordIndex> {
    let path = path.as_ref();
    let Some(reader) = open_if_exists(path)? else {
        diag.info(&format!("IDX file doesn't exist at '{}'", path.display()));
        return Ok(WordIndex::default());
    };
    let index = parse_index_from_reader(reader, diag)?;
    diag.debug(&format!("IDX: loaded {} entries from '{}'", index.len(), path.display()));
    Ok(index)
}

/// Parses index records from any buffered reader.
pub fn parse_index_from_reader<R: BufRead>(reader: R, diag: &dyn DiagnosticSink) -> Result<WordIndex> {
    let mut records = RecordReader::new(reader, Component::Index);
    let mut index = WordIndex::default();
    while let Some(word) = records.next_word()? {
        let offset = records.read_u32()?;
        let size = records.read_u32()?;
        index.push(word, DataLocation { offset, size });
    }
    if records.trailing_bytes() > 0 {
        diag.info(&format!("IDX: ignored {} unterminated trailing bytes", records.trailing_bytes()));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::diagnostics::MemorySink;
    use crate::StardictError;
    use std::io::Cursor;

    const TWO_RECORDS: &[u8] = b"--\x00\x00\x00bt\x00\x00\x19\xf6-ma\x00\x00\x00\xf5B\x00\x00\tp";

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = parse_index(dir.path().join("non_existent.idx"), &MemorySink::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.words().is_empty());
    }

    #[test]
    fn test_decodes_big_endian_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.idx");
        std::fs::write(&path, TWO_RECORDS).unwrap();

        let index = parse_index(&path, &MemorySink::new()).unwrap();
        assert_eq!(index.get("--"), Some(DataLocation::new(25204, 6646)));
        assert_eq!(index.get("-ma"), Some(DataLocation::new(62786, 2416)));
        assert_eq!(index.entries(), &[DataLocation::new(25204, 6646), DataLocation::new(62786, 2416)]);
        assert_eq!(index.at(1), Some(DataLocation::new(62786, 2416)));
        assert_eq!(index.at(2), None);
    }

    #[test]
    fn test_repeated_word_last_wins() {
        let bytes = b"a\0\0\0\0\x01\0\0\0\x02a\0\0\0\0\x03\0\0\0\x04".to_vec();
        let index = parse_index_from_reader(Cursor::new(bytes), &MemorySink::new()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.words().len(), 1);
        assert_eq!(index.get("a"), Some(DataLocation::new(3, 4)));
        assert_eq!(index.at(0), Some(DataLocation::new(1, 2)));
    }

    #[test]
    fn test_short_tail_is_truncated() {
        let mut bytes = TWO_RECORDS.to_vec();
        bytes.truncate(bytes.len() - 3);
        match parse_index_from_reader(Cursor::new(bytes), &MemorySink::new()) {
            Err(StardictError::TruncatedRecord { component, position, .. }) => {
                assert_eq!(component, Component::Index);
                assert_eq!(position, 11);
            }
            other => panic!("expected truncated record, got {:?}", other),
        }
    }

    #[test]
    fn test_terminated_word_without_tail_is_truncated() {
        let result = parse_index_from_reader(Cursor::new(b"word\0".to_vec()), &MemorySink::new());
        assert!(matches!(result, Err(StardictError::TruncatedRecord { .. })));
    }

    #[test]
    fn test_unterminated_tail_is_dropped() {
        let mut bytes = TWO_RECORDS.to_vec();
        bytes.extend_from_slice(b"xy");
        let sink = MemorySink::new();
        let index = parse_index_from_reader(Cursor::new(bytes), &sink).unwrap();
        assert_eq!(index.len(), 2);
        assert!(sink.contains("ignored 2 unterminated trailing bytes"));
    }

    #[test]
    fn test_unicode_words() {
        let mut bytes = "café".as_bytes().to_vec();
        bytes.extend_from_slice(b"\0\0\0\0\x10\0\0\0\x20");
        let index = parse_index_from_reader(Cursor::new(bytes), &MemorySink::new()).unwrap();
        assert_eq!(index.get("café"), Some(DataLocation::new(16, 32)));
    }
}

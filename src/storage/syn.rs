//! Synonym table (`.syn`) parsing.
//!
//! Each record is a zero-terminated UTF-8 synonym followed by a big-endian u32
//! holding the position of the original word in the index's word order. Several
//! records may share a synonym; their positions accumulate in file order.
//!
//! The format caps synonyms at 255 bytes. Longer entries are accepted as-is.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::Component;
use crate::storage::reader_helper::RecordReader;
use crate::utils::diagnostics::DiagnosticSink;
use crate::utils::io_utils::open_if_exists;
use crate::Result;

/// Longest synonym the format allows, in bytes.
pub const MAX_SYNONYM_LEN: usize = 255;

/// Synonym to index positions, duplicates kept.
pub type SynonymMap = HashMap<String, Vec<u32>>;

/// Parses the synonym file at `path`. An absent file yields an empty map.
///
/// # Errors
///
/// Returns [`crate::StardictError::TruncatedRecord`] if a synonym is not followed
/// by its four position bytes.
pub fn parse_synonyms<P: AsRef<Path>>(path: P, diag: &dyn DiagnosticSink) -> Result<SynonymMap> {
    let path = path.as_ref();
    let Some(reader) = open_if_exists(path)? else {
        diag.info(&format!("SYN file doesn't exist at '{}'", path.display()));
        return Ok(SynonymMap::new());
    };
    let synonyms = parse_synonyms_from_reader(reader, diag)?;
    diag.debug(&format!("SYN: loaded {} synonyms from '{}'", synonyms.len(), path.display()));
    Ok(synonyms)
}

/// Parses synonym records from any buffered reader.
pub fn parse_synonyms_from_reader<R: BufRead>(reader: R, diag: &dyn DiagnosticSink) -> Result<SynonymMap> {
    let mut records = RecordReader::new(reader, Component::Synonyms);
    let mut synonyms = SynonymMap::new();
    while let Some(word) = records.next_word()? {
        let position = records.read_u32()?;
        if word.len() > MAX_SYNONYM_LEN {
            diag.debug(&format!("SYN: synonym longer than {} bytes: {}", MAX_SYNONYM_LEN, word));
        }
        synonyms.entry(word).or_default().push(position);
    }
    if records.trailing_bytes() > 0 {
        diag.info(&format!("SYN: ignored {} unterminated trailing bytes", records.trailing_bytes()));
    }
    Ok(synonyms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::diagnostics::MemorySink;
    use crate::StardictError;
    use std::io::Cursor;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let synonyms = parse_synonyms(dir.path().join("non_existent.syn"), &MemorySink::new()).unwrap();
        assert!(synonyms.is_empty());
    }

    #[test]
    fn test_duplicate_synonyms_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.syn");
        std::fs::write(&path, b"++\x00\x00\x00bt++\x00\x00\x00f6-ma\x00\x00\x00\x19\x00f6").unwrap();

        let sink = MemorySink::new();
        let synonyms = parse_synonyms(&path, &sink).unwrap();
        assert_eq!(synonyms.len(), 2);
        assert_eq!(synonyms["++"], vec![25204, 26166]);
        assert_eq!(synonyms["-ma"], vec![6400]);
        assert!(sink.contains("ignored 2 unterminated trailing bytes"));
    }

    #[test]
    fn test_missing_position_is_truncated() {
        let result = parse_synonyms_from_reader(Cursor::new(b"ab\0\0\0\0\x01cd\0\0".to_vec()), &MemorySink::new());
        match result {
            Err(StardictError::TruncatedRecord { component, position, .. }) => {
                assert_eq!(component, Component::Synonyms);
                assert_eq!(position, 7);
            }
            other => panic!("expected truncated record, got {:?}", other),
        }
    }

    #[test]
    fn test_overlong_synonym_is_accepted() {
        let mut bytes = "x".repeat(300).into_bytes();
        bytes.extend_from_slice(b"\0\0\0\0\x07");
        let sink = MemorySink::new();
        let synonyms = parse_synonyms_from_reader(Cursor::new(bytes), &sink).unwrap();
        assert_eq!(synonyms[&"x".repeat(300)], vec![7]);
        assert!(sink.contains("longer than 255"));
    }
}

//! Descriptor (`.ifo`) parsing.
//!
//! The descriptor is a UTF-8 text file whose first line is the magic string
//! `StarDict's dict ifo file`, followed by `key=value` option lines such as
//! `bookname`, `wordcount`, `idxfilesize` or `sametypesequence`.
//!
//! Options are passed through verbatim; no known key is required or validated.
//!
//! # Examples
//!
//! ```no_run
//! use stardict::storage::ifo::parse_descriptor;
//! use stardict::utils::LogSink;
//!
//! let info = parse_descriptor("dic/foo.ifo", &LogSink)?;
//! if let Some(name) = info.get("bookname") {
//!     println!("{}", name);
//! }
//! # Ok::<(), stardict::StardictError>(())
//! ```

use std::io::{BufRead, Read};
use std::path::Path;

use indexmap::IndexMap;

use crate::utils::diagnostics::DiagnosticSink;
use crate::utils::io_utils::open_if_exists;
use crate::{Result, StardictError};

/// First line of every descriptor file.
pub const IFO_MAGIC: &str = "StarDict's dict ifo file";

/// Descriptor options in file order.
pub type DescriptorInfo = IndexMap<String, String>;

/// Parses the descriptor at `path`.
///
/// An absent file or a first line other than [`IFO_MAGIC`] yields an empty
/// mapping. Blank lines are skipped. Each remaining line is split at its first
/// `=`; key and value are trimmed, and a repeated key keeps its last value.
///
/// # Errors
///
/// Returns [`StardictError::MalformedDescriptor`] for a non-blank line without `=`,
/// and an `InvalidDataFormat` error if the file is not valid UTF-8.
pub fn parse_descriptor<P: AsRef<Path>>(path: P, diag: &dyn DiagnosticSink) -> Result<DescriptorInfo> {
    let path = path.as_ref();
    let Some(mut reader) = open_if_exists(path)? else {
        diag.info(&format!("IFO file doesn't exist at '{}'", path.display()));
        return Ok(DescriptorInfo::new());
    };

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes)?;
    parse_descriptor_text(&text, diag)
}

/// Parses descriptor content that is already in memory.
pub fn parse_descriptor_text(text: &str, diag: &dyn DiagnosticSink) -> Result<DescriptorInfo> {
    let mut lines = text.as_bytes().lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => String::new(),
    };
    let header = header.trim_start_matches('\u{feff}').trim_end();
    if header != IFO_MAGIC {
        diag.info(&format!("IFO: Incorrect header: {}", header));
        return Ok(DescriptorInfo::new());
    }

    let mut info = DescriptorInfo::new();
    for (index, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // Header is line 1
        let line_no = index + 2;
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| StardictError::malformed_descriptor(line_no, line.as_str()))?;
        info.insert(key.trim().to_string(), value.trim().to_string());
    }
    diag.debug(&format!("IFO: parsed {} options", info.len()));
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::diagnostics::MemorySink;

    fn write_ifo(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("test.ifo");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let info = parse_descriptor(dir.path().join("non_existent.ifo"), &sink).unwrap();
        assert!(info.is_empty());
        assert!(sink.contains("doesn't exist"));
    }

    #[test]
    fn test_wrong_header_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let path = write_ifo(&dir, "\nbookname=x\n");
        assert!(parse_descriptor(&path, &sink).unwrap().is_empty());
        assert!(sink.contains("Incorrect header"));
    }

    #[test]
    fn test_options_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ifo(&dir, "StarDict's dict ifo file\na=b\naa =c\n\n");
        let info = parse_descriptor(&path, &MemorySink::new()).unwrap();
        assert_eq!(info.len(), 2);
        assert_eq!(info["a"], "b");
        assert_eq!(info["aa"], "c");
    }

    #[test]
    fn test_preserves_order_and_splits_on_first_equals() {
        let text = "StarDict's dict ifo file\r\nversion=2.4.2\r\nbookname=A=B dict\r\nwordcount=3\r\n";
        let info = parse_descriptor_text(text, &MemorySink::new()).unwrap();
        let keys: Vec<&str> = info.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["version", "bookname", "wordcount"]);
        assert_eq!(info["bookname"], "A=B dict");
        assert_eq!(info["wordcount"], "3");
    }

    #[test]
    fn test_line_without_equals_is_malformed() {
        let text = "StarDict's dict ifo file\nbookname=x\n\njunk line\n";
        match parse_descriptor_text(text, &MemorySink::new()) {
            Err(StardictError::MalformedDescriptor { line_no, line, .. }) => {
                assert_eq!(line_no, 4);
                assert_eq!(line, "junk line");
            }
            other => panic!("expected malformed descriptor, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_empty() {
        assert!(parse_descriptor_text("", &MemorySink::new()).unwrap().is_empty());
    }
}

//! I/O utility functions for file and directory operations.
//!
//! This module provides helper functions for:
//! - Opening files that are allowed to be absent
//! - Deriving companion file names by extension
//! - Scanning a directory for files matching a pattern
//!
//! # Examples
//!
//! ```no_run
//! use stardict::utils::diagnostics::LogSink;
//! use stardict::utils::io_utils::{open_if_exists, scan_dir};
//! use regex::Regex;
//!
//! // Absent files are `None`, not errors
//! let reader = open_if_exists("dictionary.ifo").unwrap();
//! assert!(reader.is_none());
//!
//! let pattern = Regex::new(r"\.ifo$").unwrap();
//! let files = scan_dir("/usr/share/stardict/dic", &pattern, false, &LogSink).unwrap();
//! ```

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::utils::diagnostics::DiagnosticSink;
use crate::Result;

/// Opens a file for buffered reading, returning `None` if it does not exist.
///
/// # Errors
///
/// Returns an error for any failure other than the file being absent.
pub fn open_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<BufReader<File>>> {
    match File::open(path.as_ref()) {
        Ok(file) => Ok(Some(BufReader::new(file))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Checks if a path points to an existing regular file.
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_file()
}

/// Appends `.ext` to a path without touching its existing extension.
///
/// `foo.bar` with `ifo` becomes `foo.bar.ifo`; base names of dictionaries may
/// contain dots, so `Path::with_extension` would cut them.
pub fn with_appended_extension<P: AsRef<Path>>(base: P, ext: &str) -> PathBuf {
    let mut name: OsString = base.as_ref().as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Scan a directory for files matching the given regex pattern
///
/// # Arguments
/// * `target_dir` - The directory to scan
/// * `pattern` - A regex pattern to match file names against
/// * `recursive` - Whether to scan subdirectories recursively
/// * `diag` - Receives entries that were skipped
///
/// # Returns
/// Returns the matching file paths in directory walk order. Entries below
/// `target_dir` that cannot be read, or whose names are not UTF-8, are skipped;
/// only a failure to read `target_dir` itself is an error.
pub fn scan_dir<P: AsRef<Path>>(
    target_dir: P,
    pattern: &Regex,
    recursive: bool,
    diag: &dyn DiagnosticSink,
) -> Result<Vec<PathBuf>> {
    let walker = if recursive {
        WalkDir::new(&target_dir).follow_links(true)
    } else {
        WalkDir::new(&target_dir).follow_links(true).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                diag.info(&format!("Skipping unreadable entry: {}", e));
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        // follow_links(true) resolves symlinked files to their targets' type
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            diag.debug(&format!("Skipping non UTF-8 file name: {}", entry.path().display()));
            continue;
        };

        if pattern.is_match(file_name) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

//! Directory-level dictionary lookup across every bundle found under a root.
//!
//! # Examples
//!
//! ```no_run
//! use stardict::Dictionary;
//!
//! # fn main() -> stardict::Result<()> {
//! let dictionary = Dictionary::open("/usr/share/stardict/dic")?;
//! match dictionary.lookup("word1")? {
//!     Some(definition) => println!("{}", definition),
//!     None => println!("Not found"),
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;

use super::bundle::{Bundle, BundlePaths, SharedSink};
use crate::utils::diagnostics::LogSink;
use crate::utils::io_utils::scan_dir;
use crate::{Result, StardictError};

const IFO_PATTERN: &str = r"\.ifo$";

/// All bundles found directly inside one directory.
///
/// Bundles are ordered by base name; the first one that knows a word answers
/// for it.
pub struct Dictionary {
    bundles: Vec<Bundle>,
    diag: SharedSink,
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("bundles", &self.bundles)
            .finish_non_exhaustive()
    }
}

impl Dictionary {
    /// Opens every bundle under `root`, reporting diagnostics to the `log` facade.
    ///
    /// Each `.ifo` file directly inside `root` names a candidate bundle. A
    /// directory without candidates yields an empty dictionary. Unrelated entries
    /// that cannot be read or have non UTF-8 names are skipped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `root` does not exist or is not a directory,
    /// and [`StardictError::MissingComponent`] for the first candidate lacking its
    /// `.idx` or definitions file.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::open_with_sink(root, Arc::new(LogSink))
    }

    /// Opens every bundle under `root` with a caller-provided diagnostic sink.
    pub fn open_with_sink<P: AsRef<Path>>(root: P, diag: SharedSink) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(StardictError::invalid_path(root));
        }
        if !root.is_dir() {
            return Err(StardictError::invalid_parameter(format!("Not a directory: {}", root.display())));
        }

        let pattern = Regex::new(IFO_PATTERN).map_err(|e| StardictError::invalid_parameter(e.to_string()))?;
        let mut candidates: Vec<BundlePaths> = scan_dir(root, &pattern, false, diag.as_ref())?
            .iter()
            .filter_map(BundlePaths::from_descriptor)
            .collect();
        candidates.sort_by(|a, b| a.base().cmp(b.base()));

        let mut bundles = Vec::with_capacity(candidates.len());
        for paths in candidates {
            diag.debug(&format!("Opening dictionary '{}'", paths.base().display()));
            bundles.push(Bundle::open_with_sink(paths.base(), diag.clone())?);
        }
        diag.info(&format!("Found {} dictionaries under '{}'", bundles.len(), root.display()));

        Ok(Self { bundles, diag })
    }

    /// Looks up `word` and decodes the definition as UTF-8.
    ///
    /// Returns `Ok(None)` when no bundle knows the word.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDataFormat` if the definition is not valid UTF-8.
    pub fn lookup(&self, word: &str) -> Result<Option<String>> {
        match self.lookup_bytes(word)? {
            Some(data) => Ok(Some(String::from_utf8(data)?)),
            None => Ok(None),
        }
    }

    /// Looks up `word` and returns the raw definition bytes of the first bundle
    /// that has it.
    pub fn lookup_bytes(&self, word: &str) -> Result<Option<Vec<u8>>> {
        for bundle in &self.bundles {
            if let Some(data) = bundle.lookup_local(word)? {
                self.diag.debug(&format!("'{}' found in '{}'", word, bundle.book_name()));
                return Ok(Some(data));
            }
        }
        self.diag.debug(&format!("'{}' not found in {} dictionaries", word, self.bundles.len()));
        Ok(None)
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

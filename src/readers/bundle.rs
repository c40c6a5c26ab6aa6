//! A single StarDict dictionary: one descriptor, index, definitions blob and
//! optional synonym table sharing a base name.
//!
//! # Examples
//!
//! ```no_run
//! use stardict::readers::Bundle;
//!
//! # fn main() -> stardict::Result<()> {
//! // Opens dic/wordnet.ifo, .idx, .dict(.dz) and, if present, .syn
//! let bundle = Bundle::open("dic/wordnet")?;
//! if let Some(definition) = bundle.lookup_local("hello")? {
//!     println!("{}", String::from_utf8_lossy(&definition));
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Component;
use crate::storage::dict_data::{read_definition_with, DictFormat};
use crate::storage::idx::{parse_index, DataLocation, WordIndex};
use crate::storage::ifo::{parse_descriptor, DescriptorInfo};
use crate::storage::syn::{parse_synonyms, SynonymMap};
use crate::utils::diagnostics::{DiagnosticSink, LogSink};
use crate::utils::io_utils::{file_exists, with_appended_extension};
use crate::{Result, StardictError};

const IFO_EXT: &str = "ifo";
const IDX_EXT: &str = "idx";
const SYN_EXT: &str = "syn";

/// Shared handle to a diagnostic sink.
pub type SharedSink = Arc<dyn DiagnosticSink + Send + Sync>;

/// Companion file paths derived from a bundle's base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    base: PathBuf,
    descriptor: PathBuf,
    index: PathBuf,
    synonyms: PathBuf,
    definitions: PathBuf,
    compressed_definitions: PathBuf,
}

impl BundlePaths {
    /// Derives the companion paths of `base`, a path without extension.
    pub fn new<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        Self {
            base: base.to_path_buf(),
            descriptor: with_appended_extension(base, IFO_EXT),
            index: with_appended_extension(base, IDX_EXT),
            synonyms: with_appended_extension(base, SYN_EXT),
            definitions: with_appended_extension(base, DictFormat::Plain.extension()),
            compressed_definitions: with_appended_extension(base, DictFormat::Dictzip.extension()),
        }
    }

    /// Derives the companion paths from a descriptor path ending in `.ifo`.
    pub fn from_descriptor<P: AsRef<Path>>(ifo_path: P) -> Option<Self> {
        let ifo_path = ifo_path.as_ref();
        let name = ifo_path.file_name()?.to_str()?;
        let stem = name.strip_suffix(".ifo")?;
        Some(Self::new(ifo_path.with_file_name(stem)))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }

    pub fn index(&self) -> &Path {
        &self.index
    }

    pub fn synonyms(&self) -> &Path {
        &self.synonyms
    }

    /// Path of the definitions blob in the given format.
    pub fn definitions(&self, format: DictFormat) -> &Path {
        match format {
            DictFormat::Plain => &self.definitions,
            DictFormat::Dictzip => &self.compressed_definitions,
        }
    }

    /// The definitions file present on disk, preferring the uncompressed one.
    pub fn find_definitions(&self) -> Option<(&Path, DictFormat)> {
        [DictFormat::Plain, DictFormat::Dictzip]
            .into_iter()
            .map(|format| (self.definitions(format), format))
            .find(|(path, _)| file_exists(path))
    }
}

/// One opened dictionary.
///
/// Descriptor, index and synonyms are parsed once when the bundle is opened.
/// The definitions blob is reopened for every lookup.
pub struct Bundle {
    paths: BundlePaths,
    descriptor: DescriptorInfo,
    index: WordIndex,
    synonyms: SynonymMap,
    definitions: PathBuf,
    format: DictFormat,
    diag: SharedSink,
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("base", &self.paths.base)
            .field("definitions", &self.definitions)
            .field("format", &self.format)
            .field("words", &self.index.len())
            .field("synonyms", &self.synonyms.len())
            .finish_non_exhaustive()
    }
}

impl Bundle {
    /// Opens the bundle at `base`, reporting diagnostics to the `log` facade.
    ///
    /// # Errors
    ///
    /// Returns [`StardictError::MissingComponent`] if the `.ifo`, the `.idx` or both
    /// `.dict` and `.dict.dz` are missing, and any parse error of those files.
    pub fn open<P: AsRef<Path>>(base: P) -> Result<Self> {
        Self::open_with_sink(base, Arc::new(LogSink))
    }

    /// Opens the bundle at `base` with a caller-provided diagnostic sink.
    pub fn open_with_sink<P: AsRef<Path>>(base: P, diag: SharedSink) -> Result<Self> {
        let paths = BundlePaths::new(base);
        if !file_exists(paths.descriptor()) {
            return Err(StardictError::missing_component(paths.base(), Component::Descriptor));
        }
        if !file_exists(paths.index()) {
            return Err(StardictError::missing_component(paths.base(), Component::Index));
        }
        let (definitions, format) = paths
            .find_definitions()
            .map(|(path, format)| (path.to_path_buf(), format))
            .ok_or_else(|| StardictError::missing_component(paths.base(), Component::Definitions))?;

        let descriptor = parse_descriptor(paths.descriptor(), diag.as_ref())?;
        let index = parse_index(paths.index(), diag.as_ref())?;
        let synonyms = if file_exists(paths.synonyms()) {
            parse_synonyms(paths.synonyms(), diag.as_ref())?
        } else {
            diag.debug(&format!("No synonyms for '{}'", paths.base().display()));
            SynonymMap::new()
        };

        diag.debug(&format!(
            "Opened '{}': {} words, {} synonyms, {:?} definitions",
            paths.base().display(),
            index.len(),
            synonyms.len(),
            format
        ));
        Ok(Self { paths, descriptor, index, synonyms, definitions, format, diag })
    }

    /// Looks up `word` in this bundle only.
    ///
    /// A literal index hit wins. Otherwise each index position the synonym table
    /// lists for `word` is tried in order and the first one inside the index is
    /// used. Returns `Ok(None)` on a miss, including when the definitions blob has
    /// disappeared since the bundle was opened.
    pub fn lookup_local(&self, word: &str) -> Result<Option<Vec<u8>>> {
        if let Some(location) = self.index.get(word) {
            return self.read(location);
        }
        let Some(positions) = self.synonyms.get(word) else {
            return Ok(None);
        };
        for &position in positions {
            match self.index.at(position) {
                Some(location) => {
                    self.diag.debug(&format!("'{}' resolved as synonym of index entry {}", word, position));
                    return self.read(location);
                }
                None => self.diag.debug(&format!(
                    "Synonym '{}' points at index entry {} but the index has {}",
                    word,
                    position,
                    self.index.len()
                )),
            }
        }
        Ok(None)
    }

    fn read(&self, location: DataLocation) -> Result<Option<Vec<u8>>> {
        read_definition_with(&self.definitions, self.format, location.offset, location.size, self.diag.as_ref())
    }

    pub fn paths(&self) -> &BundlePaths {
        &self.paths
    }

    pub fn descriptor(&self) -> &DescriptorInfo {
        &self.descriptor
    }

    pub fn index(&self) -> &WordIndex {
        &self.index
    }

    pub fn synonyms(&self) -> &SynonymMap {
        &self.synonyms
    }

    /// The definitions file chosen when the bundle was opened.
    pub fn definitions_path(&self) -> &Path {
        &self.definitions
    }

    pub fn format(&self) -> DictFormat {
        self.format
    }

    /// The descriptor's `bookname`, or the base file name when it has none.
    pub fn book_name(&self) -> String {
        match self.descriptor.get("bookname") {
            Some(name) => name.clone(),
            None => self
                .paths
                .base()
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

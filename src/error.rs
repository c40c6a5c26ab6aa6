//! Error types and result type for the stardict crate.
//!
//! This module defines all error variants that can occur when reading StarDict
//! dictionary bundles. It uses the `snafu` library for ergonomic error handling with
//! automatic backtrace capture.
//!
//! A missing single file is never an error at the parser level: the parsers return
//! an empty result instead. Errors are reserved for structural problems (a bundle
//! lacking a mandatory companion file), malformed content and invalid arguments.
//!
//! # Examples
//!
//! ```
//! use stardict::{Result, StardictError};
//!
//! fn open_root() -> Result<()> {
//!     Err(StardictError::invalid_path("/no/such/dir"))
//! }
//!
//! match open_root() {
//!     Ok(()) => {}
//!     Err(e) => assert!(e.is_invalid_parameter()),
//! }
//! ```
//!
//! # Error Variants
//!
//! - [`StardictError::Io`]: I/O errors from file operations
//! - [`StardictError::InvalidParameter`]: Invalid arguments, e.g. a nonexistent root directory
//! - [`StardictError::MissingComponent`]: A bundle lacks its descriptor, index or definitions file
//! - [`StardictError::MalformedDescriptor`]: A descriptor line is not `key=value`
//! - [`StardictError::TruncatedRecord`]: An index or synonym record is cut short
//! - [`StardictError::InvalidDataFormat`]: Malformed data (bad UTF-8, bad dictzip header)
//! - [`StardictError::CompressionError`]: Dictzip chunk inflation failures

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use snafu::{Backtrace, Snafu};

// Re-export snafu for context providers
pub use snafu;

/// The companion files that make up a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// The `.ifo` descriptor
    Descriptor,
    /// The `.idx` word index
    Index,
    /// The `.syn` synonym table
    Synonyms,
    /// The `.dict` or `.dict.dz` definitions blob
    Definitions,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Descriptor => "descriptor (.ifo)",
            Component::Index => "index (.idx)",
            Component::Synonyms => "synonyms (.syn)",
            Component::Definitions => "definitions (.dict or .dict.dz)",
        };
        f.write_str(name)
    }
}

/// Main error type for the stardict crate.
///
/// All errors include automatic backtrace capture for debugging purposes.
/// Use the helper methods on `StardictError` for convenient error construction.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StardictError {
    /// I/O error occurred during file operations.
    #[snafu(display("IO error: {source}"))]
    Io {
        source: io::Error,
        backtrace: Backtrace,
    },

    /// Function was called with invalid parameters.
    #[snafu(display("Invalid parameter: {message}"))]
    InvalidParameter {
        message: String,
        backtrace: Backtrace,
    },

    /// A bundle candidate is missing one of its mandatory files.
    #[snafu(display("Incomplete dictionary at {}: missing {component}", base.display()))]
    MissingComponent {
        base: PathBuf,
        component: Component,
        backtrace: Backtrace,
    },

    /// A descriptor line has no `=` separator.
    #[snafu(display("Malformed descriptor line {line_no}: {line:?}"))]
    MalformedDescriptor {
        line_no: usize,
        line: String,
        backtrace: Backtrace,
    },

    /// A binary record ended before its fixed-width tail was complete.
    #[snafu(display("Truncated {component} record at byte {position}"))]
    TruncatedRecord {
        component: Component,
        position: u64,
        backtrace: Backtrace,
    },

    /// Dictionary file data is malformed or doesn't match expected format.
    #[snafu(display("Invalid data format: {message}"))]
    InvalidDataFormat {
        message: String,
        backtrace: Backtrace,
    },

    /// Error during compression or decompression operations.
    #[snafu(display("Compression error: {message}"))]
    CompressionError {
        message: String,
        backtrace: Backtrace,
    },
}

// For automatic conversions from standard error types
impl From<io::Error> for StardictError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, backtrace: Backtrace::capture() }
    }
}

impl From<std::string::FromUtf8Error> for StardictError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        Self::InvalidDataFormat { message: format!("Invalid UTF-8 (String): {}", source), backtrace: Backtrace::capture() }
    }
}

impl From<std::str::Utf8Error> for StardictError {
    fn from(source: std::str::Utf8Error) -> Self {
        Self::InvalidDataFormat { message: format!("Invalid UTF-8 (&str): {}", source), backtrace: Backtrace::capture() }
    }
}

impl From<walkdir::Error> for StardictError {
    fn from(source: walkdir::Error) -> Self {
        Self::InvalidDataFormat { message: format!("Walk directory error: {}", source), backtrace: Backtrace::capture() }
    }
}

/// Helper methods for creating errors without context providers.
impl StardictError {
    /// Creates an `InvalidParameter` error with the given message.
    ///
    /// # Examples
    ///
    /// ```
    /// use stardict::StardictError;
    ///
    /// let error = StardictError::invalid_parameter("Path cannot be empty");
    /// assert!(error.is_invalid_parameter());
    /// ```
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `InvalidParameter` error for an invalid path.
    pub fn invalid_path<P: AsRef<Path>>(path: P) -> Self {
        Self::InvalidParameter {
            message: format!("Invalid path: {}", path.as_ref().display()),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `InvalidDataFormat` error with the given message.
    pub fn invalid_data_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidDataFormat {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `MissingComponent` error for the bundle rooted at `base`.
    pub fn missing_component<P: Into<PathBuf>>(base: P, component: Component) -> Self {
        Self::MissingComponent {
            base: base.into(),
            component,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `MalformedDescriptor` error. `line_no` is one-based.
    pub fn malformed_descriptor<S: Into<String>>(line_no: usize, line: S) -> Self {
        Self::MalformedDescriptor {
            line_no,
            line: line.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `TruncatedRecord` error for a record starting at `position`.
    pub fn truncated_record(component: Component, position: u64) -> Self {
        Self::TruncatedRecord {
            component,
            position,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `CompressionError` for decompression failures.
    pub fn decompression_error<S: Into<String>>(message: S) -> Self {
        Self::CompressionError {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `CompressionError` with the given message.
    pub fn compression_error<S: Into<String>>(message: S) -> Self {
        Self::CompressionError {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Checks if this error reports an incomplete bundle.
    pub fn is_dictionary_error(&self) -> bool {
        matches!(self, StardictError::MissingComponent { .. })
    }

    /// Checks if this error is an `InvalidParameter` variant.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, StardictError::InvalidParameter { .. })
    }
}

/// Converts back into `io::Error` so the dictzip reader can surface crate errors
/// through the `Read`/`Seek` traits.
impl From<StardictError> for io::Error {
    fn from(err: StardictError) -> Self {
        match err {
            StardictError::Io { source, .. } => source,
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

/// A specialized `Result` type for stardict operations.
///
/// This is a convenience type alias that uses [`StardictError`] as the error type.
pub type Result<T> = std::result::Result<T, StardictError>;

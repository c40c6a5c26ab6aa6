//! # stardict - StarDict Dictionary Reader
//!
//! This crate reads StarDict dictionary distributions and resolves a word to its
//! definition text. A distribution is a directory holding one or more *bundles*,
//! each a set of sibling files sharing a base name:
//!
//! - `.ifo`: descriptor, a text file of `key=value` options behind a magic line
//! - `.idx`: sorted word index of `(word, offset, size)` records
//! - `.dict` or `.dict.dz`: definitions blob, optionally dictzip compressed
//! - `.syn` (optional): synonyms pointing at positions in the index
//!
//! ## Quick Start
//!
//! ```no_run
//! use stardict::Dictionary;
//!
//! # fn main() -> stardict::Result<()> {
//! let dictionary = Dictionary::open("/usr/share/stardict/dic")?;
//! if let Some(definition) = dictionary.lookup("hello")? {
//!     println!("{}", definition);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Storage**: [`storage`] parses the individual files (descriptor, index,
//!   synonyms) and reads definitions from the blob
//! - **Readers**: [`readers`] combines them into a [`Bundle`] and aggregates
//!   bundles into a [`Dictionary`]
//! - **Utilities**: [`utils`] for dictzip random access, directory scanning and
//!   the injectable diagnostic sink
//!
//! ## Error Handling
//!
//! All fallible operations return a [`Result<T>`] type, where errors are represented by
//! [`StardictError`]. Absent single files are not errors: parsers return empty
//! results and lookups return `Ok(None)`.

pub mod error;
pub mod readers;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use readers::{Bundle, BundlePaths, Dictionary};
pub use storage::{DataLocation, DescriptorInfo, DictFormat, SynonymMap, WordIndex};

// Re-export error types for convenience
pub use error::{Component, StardictError, Result, snafu};

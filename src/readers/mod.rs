// Readers for StarDict dictionaries
//
// This module provides the bundle reader, which opens one dictionary's companion
// files, and the directory-level dictionary that queries all bundles in order.

pub mod bundle;
pub mod dictionary;

pub use bundle::{Bundle, BundlePaths, SharedSink};
pub use dictionary::Dictionary;

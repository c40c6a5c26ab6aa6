// Utility functions and helpers
//
// This module provides dictzip random access, file and directory helpers, and
// the diagnostic sink used for logging.

pub mod diagnostics;
pub mod dictzip;
pub mod io_utils;

pub use diagnostics::{DiagnosticSink, Level, LogSink, MemorySink};
pub use dictzip::{write_dictzip, DictzipHeader, DictzipReader};
pub use io_utils::{open_if_exists, scan_dir, with_appended_extension};

//! Injectable diagnostic sink.
//!
//! Parsers, bundles and dictionaries report what they skip or tolerate through a
//! [`DiagnosticSink`] handed to them at construction, instead of a process-wide
//! logger. [`LogSink`] forwards to the `log` facade and is the default;
//! [`MemorySink`] keeps the messages for inspection.

use std::sync::Mutex;

/// Log target used by [`LogSink`].
pub const LOG_TARGET: &str = "stardict";

/// Receiver of informational and debug messages.
pub trait DiagnosticSink {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade under the `stardict` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn info(&self, message: &str) {
        log::info!(target: LOG_TARGET, "{}", message);
    }

    fn debug(&self, message: &str) {
        log::debug!(target: LOG_TARGET, "{}", message);
    }
}

/// Severity of a message captured by [`MemorySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
}

/// Collects messages in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the captured messages in arrival order.
    pub fn records(&self) -> Vec<(Level, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Checks whether any captured message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|(_, message)| message.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((level, message.to_string()));
    }
}

impl DiagnosticSink for MemorySink {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }
}

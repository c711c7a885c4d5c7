//! Log entries and the per-session log buffer.

use serde::{Deserialize, Serialize};

/// A single log line received from the stream.
///
/// The `id` is the timestamp followed by the buffer length at insertion time,
/// which makes it unique within one session's buffer even when several
/// entries share a timestamp. It is not globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Buffer-local identifier (`{timestamp}{index}`)
    pub id: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// The log line content
    pub message: String,
}

/// Append-only, unbounded buffer of log entries for one session.
///
/// Entries are never removed. Reconnecting a session keeps its buffer, so
/// consumers always see the full history of the session.
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: Vec<LogEntry>,
}

impl LogBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a new entry and return a reference to it.
    pub fn push(&mut self, timestamp: i64, message: String) -> &LogEntry {
        let id = format!("{timestamp}{}", self.entries.len());
        self.entries.push(LogEntry {
            id,
            timestamp,
            message,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Copy of all entries in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    /// Number of entries in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

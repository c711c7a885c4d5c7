//! Terminal output of log entries.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local, TimeZone};
use logtail_core::LogEntry;

/// Format one entry as `HH:MM:SS.mmm  message` in the given time zone.
pub fn format_entry<Tz: TimeZone>(entry: &LogEntry, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let time = DateTime::from_timestamp_millis(entry.timestamp).map_or_else(
        || "--:--:--.---".to_string(),
        |utc| utc.with_timezone(tz).format("%H:%M:%S%.3f").to_string(),
    );
    format!("{time}  {}", entry.message)
}

struct PrinterState<W> {
    out: W,
    printed: usize,
}

/// Prints each entry of a growing snapshot exactly once.
///
/// Snapshots only ever grow, so the printer remembers how many entries it
/// has written and skips that prefix next time.
pub struct EntryPrinter<W> {
    state: Mutex<PrinterState<W>>,
}

impl EntryPrinter<io::Stdout> {
    /// Printer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> EntryPrinter<W> {
    /// Printer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            state: Mutex::new(PrinterState { out, printed: 0 }),
        }
    }

    /// Write the entries of `snapshot` not printed yet, in local time.
    pub fn print_new(&self, snapshot: &[LogEntry]) -> io::Result<()> {
        self.print_new_in(snapshot, &Local)
    }

    /// Write the entries of `snapshot` not printed yet, in `tz`.
    pub fn print_new_in<Tz: TimeZone>(&self, snapshot: &[LogEntry], tz: &Tz) -> io::Result<()>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let start = state.printed.min(snapshot.len());
        for entry in &snapshot[start..] {
            writeln!(state.out, "{}", format_entry(entry, tz))?;
        }
        state.printed = snapshot.len();
        state.out.flush()
    }

    /// Number of entries written so far.
    pub fn printed(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .printed
    }

    /// Take the writer back.
    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(timestamp: i64, message: &str) -> LogEntry {
        LogEntry {
            id: format!("{timestamp}0"),
            timestamp,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_format_entry() {
        // 2024-05-01T12:34:56.789Z
        let line = format_entry(&entry(1_714_566_896_789, "Building site"), &Utc);
        assert_eq!(line, "12:34:56.789  Building site");
    }

    #[test]
    fn test_format_out_of_range_timestamp() {
        let line = format_entry(&entry(i64::MAX, "x"), &Utc);
        assert_eq!(line, "--:--:--.---  x");
    }

    #[test]
    fn test_prints_each_entry_once() {
        let printer = EntryPrinter::new(Vec::new());
        let first = vec![entry(0, "a"), entry(1, "b")];
        let second = vec![entry(0, "a"), entry(1, "b"), entry(2, "c")];

        printer.print_new_in(&first, &Utc).unwrap();
        printer.print_new_in(&second, &Utc).unwrap();
        printer.print_new_in(&second, &Utc).unwrap();
        assert_eq!(printer.printed(), 3);

        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(
            out,
            "00:00:00.000  a\n00:00:00.001  b\n00:00:00.002  c\n"
        );
    }
}

//! Human-readable diagnostic log
//!
//! Appends `[HH:MM:SS.mmm] message` lines to a file. Every I/O failure is
//! swallowed; the log must never take the daemon down.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::input::Timestamp;
use crate::signals::{InputSignal, SignalHandler};

pub struct DiagnosticLog {
    path: PathBuf,
    file: Option<File>,
}

impl DiagnosticLog {
    /// Open (or create) the log for appending. A log that cannot be opened
    /// silently discards lines.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path).ok();
        if file.is_none() {
            tracing::debug!(path = %path.display(), "Diagnostic log unavailable");
        }
        Self { path, file }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&mut self, timestamp: Timestamp, message: &str) {
        if let Some(file) = self.file.as_mut() {
            let _ = writeln!(file, "[{}] {}", timestamp.format("%H:%M:%S%.3f"), message);
        }
    }
}

impl SignalHandler for DiagnosticLog {
    fn handle_signal(&mut self, signal: &InputSignal) {
        self.write(signal.timestamp(), &signal.describe());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quill_types::Action;

    fn ts() -> Timestamp {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_milli_opt(21, 4, 5, 67)
            .unwrap()
            .and_utc()
            .fixed_offset()
    }

    #[test]
    fn test_lines_are_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.log");

        let mut log = DiagnosticLog::open(&path);
        log.write(ts(), "Writing daemon started");
        log.handle_signal(&InputSignal::ActionRequested {
            action: Action::Sleep,
            timestamp: ts(),
        });

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "[21:04:05.067] Writing daemon started");
        assert_eq!(lines[1], "[21:04:05.067] Action requested: sleep");
    }

    #[test]
    fn test_unopenable_log_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = DiagnosticLog::open(dir.path().join("missing/dir/quill.log"));
        log.write(ts(), "dropped");
        assert!(!log.path().exists());
    }
}

use hashbrown::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::context::StatusError;
use crate::input::LogicalButton;

/// Named status records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusRecord {
    Button(LogicalButton),
    WritingMode,
    LastAction,
    Stats,
}

impl StatusRecord {
    pub fn name(&self) -> &'static str {
        match self {
            StatusRecord::Button(button) => button.as_str(),
            StatusRecord::WritingMode => "writing_mode",
            StatusRecord::LastAction => "last_action",
            StatusRecord::Stats => "stats.json",
        }
    }

    pub fn all() -> impl Iterator<Item = StatusRecord> {
        LogicalButton::ALL
            .into_iter()
            .map(StatusRecord::Button)
            .chain([
                StatusRecord::WritingMode,
                StatusRecord::LastAction,
                StatusRecord::Stats,
            ])
    }
}

/// Read-only status surface for other processes.
///
/// `publish` is best-effort and must not block for long: failures are logged
/// and dropped.
pub trait StatusPublisher: Send + Sync {
    fn register(&self) -> Result<(), StatusError>;
    fn unregister(&self);
    fn publish(&self, record: StatusRecord, value: &str);
}

// ─────────────────────────────────────────────────────────────────────────────
// File publisher
// ─────────────────────────────────────────────────────────────────────────────

/// One file per record inside a status directory, overwritten on every publish
#[derive(Debug)]
pub struct FileStatusPublisher {
    directory: PathBuf,
}

impl FileStatusPublisher {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn record_path(&self, record: StatusRecord) -> PathBuf {
        self.directory.join(record.name())
    }

    /// Write into a temporary file in the status directory, then rename it
    /// over the record. Readers see either the old or the new contents.
    fn replace_record(&self, path: &Path, value: &str) -> io::Result<()> {
        let mut temp = tempfile::NamedTempFile::new_in(&self.directory)?;
        temp.write_all(value.as_bytes())?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl StatusPublisher for FileStatusPublisher {
    fn register(&self) -> Result<(), StatusError> {
        fs::create_dir_all(&self.directory).map_err(|source| StatusError::CreateDir {
            path: self.directory.clone(),
            source,
        })?;

        // Prove the directory is writable before reporting success
        let path = self.record_path(StatusRecord::LastAction);
        self.replace_record(&path, "")
            .map_err(|source| StatusError::Write { path, source })?;

        tracing::debug!(directory = %self.directory.display(), "Status directory registered");
        Ok(())
    }

    fn unregister(&self) {
        for record in StatusRecord::all() {
            let path = self.record_path(record);
            if let Err(e) = fs::remove_file(&path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                tracing::debug!(path = %path.display(), error = %e, "Failed to remove status record");
            }
        }
    }

    fn publish(&self, record: StatusRecord, value: &str) {
        let path = self.record_path(record);
        if let Err(e) = self.replace_record(&path, value) {
            tracing::debug!(path = %path.display(), error = %e, "Failed to write status record");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory publisher
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps records in memory; for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryStatusPublisher {
    records: Mutex<HashMap<StatusRecord, String>>,
    registered: AtomicBool,
}

impl MemoryStatusPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, record: StatusRecord) -> Option<String> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(&record).cloned())
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }
}

impl StatusPublisher for MemoryStatusPublisher {
    fn register(&self) -> Result<(), StatusError> {
        self.registered.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn unregister(&self) {
        self.registered.store(false, Ordering::SeqCst);
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }

    fn publish(&self, record: StatusRecord, value: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(record, value.to_string());
        }
    }
}

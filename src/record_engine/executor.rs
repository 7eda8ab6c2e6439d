//! Collaborator traits for the record engine
//!
//! The engine never owns a database driver, a filesystem layout or an
//! audit sink; it calls narrow injected traits. Execution failures surface
//! as a single error kind - driver-specific codes are the collaborator's
//! business, and retry policy is the caller's.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// One fetched row: column (or field alias) name to value. A missing value
/// is SQL NULL.
pub type Row = HashMap<String, Option<String>>;

/// The single error kind for storage failures.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("statement execution failed: {message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        ExecutionError {
            message: message.into(),
        }
    }
}

/// Executes raw SQL. Operations are synchronous and blocking; none are
/// cancellable mid-flight.
pub trait SqlExecutor {
    /// Run a statement producing rows (SELECT/SHOW).
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, ExecutionError>;

    /// Run a statement producing an affected-row count.
    fn execute(&mut self, sql: &str) -> Result<u64, ExecutionError>;

    /// Open a transaction. Collaborators without transaction support keep
    /// the no-op defaults.
    fn begin(&mut self) -> Result<(), ExecutionError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ExecutionError> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ExecutionError> {
        Ok(())
    }
}

/// Stores files addressed by deterministic masked paths.
pub trait FileStore {
    /// Delete a file if it exists; absence is not an error.
    fn remove_if_exists(&mut self, path: &str) -> Result<(), ExecutionError>;
}

/// File store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFileStore { root: root.into() }
    }
}

impl FileStore for LocalFileStore {
    fn remove_if_exists(&mut self, path: &str) -> Result<(), ExecutionError> {
        let full = self.root.join(path);
        match std::fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ExecutionError::new(format!(
                "removing {}: {}",
                full.display(),
                e
            ))),
        }
    }
}

/// Records mutations of static (reference-data) tables.
pub trait ChangeLog {
    fn record(&mut self, subject: &str, message: &str, sql: &str);
}

/// A recorded audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogEntry {
    pub at: DateTime<Utc>,
    pub subject: String,
    pub message: String,
    pub sql: String,
}

/// In-memory audit log; useful for tests and as a buffer before a real
/// sink.
#[derive(Debug, Clone, Default)]
pub struct MemoryChangeLog {
    pub entries: Vec<ChangeLogEntry>,
}

impl MemoryChangeLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeLog for MemoryChangeLog {
    fn record(&mut self, subject: &str, message: &str, sql: &str) {
        self.entries.push(ChangeLogEntry {
            at: Utc::now(),
            subject: subject.to_string(),
            message: message.to_string(),
            sql: sql.to_string(),
        });
    }
}

/// Discards audit entries. For schemas with no static tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChangeLog;

impl ChangeLog for NullChangeLog {
    fn record(&mut self, _subject: &str, _message: &str, _sql: &str) {}
}

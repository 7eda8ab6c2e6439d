//! Record operations driven by schema metadata
//!
//! The engine builds and executes the statements behind record management:
//! cascading deletes (with sibling renumbering, stored-file cleanup and
//! audit logging) and row identifier resolution. Storage, files and the
//! audit log are injected collaborators; see [`executor`].

pub mod delete;
pub mod errors;
pub mod executor;
mod identifier;

// Re-export commonly used types
pub use delete::{EngineOptions, RecordEngine};
pub use errors::RecordError;
pub use executor::{
    ChangeLog, ChangeLogEntry, ExecutionError, FileStore, LocalFileStore, MemoryChangeLog,
    NullChangeLog, Row, SqlExecutor,
};

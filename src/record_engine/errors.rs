use thiserror::Error;

use super::executor::ExecutionError;
use crate::schema_catalog::SchemaError;
use crate::sql_generator::SqlGeneratorError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Generator(#[from] SqlGeneratorError),
    /// A storage failure, surfaced as-is; the engine never retries.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    /// Caller bug: the supplied key tuple does not match the table's
    /// primary key.
    #[error("Expected {expected} primary key value(s) for table `{table}`, got {got}")]
    KeyArity {
        table: String,
        expected: usize,
        got: usize,
    },
    /// Caller bug: a supplied key name is not part of the primary key.
    #[error("`{column}` is not a primary key column of table `{table}`")]
    NotAKeyColumn { table: String, column: String },
    /// A parent link whose destination column is outside the destination
    /// table's primary key; the cascade cannot address child rows.
    #[error("Parent link into `{table}` targets `{column}`, which is not in its primary key")]
    UnkeyedChildLink { table: String, column: String },
    /// Parent links form a cycle; the row was reached twice during one
    /// cascade.
    #[error("Cycle of parent links detected while deleting from `{table}`")]
    LinkCycle { table: String },
}

//! Schema catalog: the in-memory model of tables, columns, links and
//! indices, plus the definition documents it round-trips through.

pub mod column;
pub mod config;
pub mod database;
pub mod errors;
pub mod link;
pub mod sql_types;
pub mod table;
pub mod warnings;

// Re-export commonly used types
pub use column::{Column, ColumnKind, DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT};
pub use config::{IndexDefinition, OrderItemDefinition, SchemaDefinition, TableDefinition};
pub use database::{ChildLink, ColumnRemoval, Database};
pub use errors::SchemaError;
pub use link::{Link, TemplatePart};
pub use sql_types::SqlType;
pub use table::{
    AccessLevel, Action, ColumnAdded, DisplayStyle, InsertPosition, OrderDirection, OrderList,
    Table, PRIMARY_KEY,
};
pub use warnings::{SeverReason, ValidationWarning};

//! SQL statement construction and rendering
//!
//! Statements are built as trees (field projections, join lists, boolean
//! condition trees) and rendered through [`ToSql`]. Rendering is pure:
//! the same tree always yields the same SQL.

pub mod common;
pub mod condition;
pub mod ddl;
pub mod errors;
pub mod join_resolver;
pub mod query;
pub mod to_sql;

// Re-export commonly used types
pub use condition::{
    Combine, CompareOp, Comparison, ConditionNode, ConditionTree, IsKeyword, Operand, Rhs,
    SqlLiteral,
};
pub use ddl::create_table_sql;
pub use errors::SqlGeneratorError;
pub use join_resolver::{resolve_join, ColumnRef};
pub use query::{
    DeleteQuery, InsertQuery, Join, JoinKind, RawQuery, SelectField, SelectQuery, SetValue,
    TableRef, UpdateQuery,
};
pub use to_sql::ToSql;

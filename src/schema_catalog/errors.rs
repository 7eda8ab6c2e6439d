//! Schema error types
//!
//! Fatal schema problems: a name that does not resolve, a missing primary
//! key where one is required, or a definition document that cannot be
//! loaded. Non-fatal findings are [`ValidationWarning`]s instead.
//!
//! [`ValidationWarning`]: super::warnings::ValidationWarning

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("No table named `{0}` in this schema")]
    UnknownTable(String),
    #[error("No column named `{column}` in table `{table}`")]
    UnknownColumn { table: String, column: String },
    #[error("Table `{0}` has no primary key defined")]
    MissingPrimaryKey(String),
    #[error("Invalid index definition: {0}")]
    InvalidIndex(String),
    #[error("Failed to read schema definition: {0}")]
    DefinitionRead(String),
    #[error("Failed to parse schema definition: {0}")]
    DefinitionParse(String),
    #[error("Invalid schema definition: {0}")]
    InvalidDefinition(String),
}

impl SchemaError {
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        SchemaError::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create an InvalidDefinition error with context information
    pub fn invalid_definition_with_context(
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        let msg = message.into();
        let ctx = context.into();
        SchemaError::InvalidDefinition(format!("{}\n  Context: {}", msg, ctx))
    }
}

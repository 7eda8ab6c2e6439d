//! Non-fatal validation findings
//!
//! Warnings are collected and returned alongside a successful result so the
//! caller can inform the user; the schema remains valid, just less
//! descriptive. They are also mirrored to the log.

use std::fmt;

/// Why a link was severed during a schema mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverReason {
    /// The link's destination column was removed.
    TargetRemoved,
    /// The only column in the link's description was removed.
    DescriptionEmptied,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    LinkSevered {
        from_table: String,
        from_column: String,
        reason: SeverReason,
    },
    /// The table no longer has any view-order columns; listing order is
    /// effectively arbitrary.
    EmptyViewOrder { table: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::LinkSevered {
                from_table,
                from_column,
                reason,
            } => {
                let why = match reason {
                    SeverReason::TargetRemoved => "its destination column was removed",
                    SeverReason::DescriptionEmptied => "its only description column was removed",
                };
                write!(
                    f,
                    "Link from {}.{} has been severed because {}",
                    from_table, from_column, why
                )
            }
            ValidationWarning::EmptyViewOrder { table } => {
                write!(
                    f,
                    "Table {} no longer has any order columns; rows will appear in arbitrary order",
                    table
                )
            }
        }
    }
}

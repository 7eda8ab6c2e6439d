//! Cross-table links and display templates
//!
//! A [`Link`] stands in for a database-enforced foreign key: it points from
//! a source column at a destination column in another table, and carries the
//! description used when the destination row is rendered as a choice.

use serde::{Deserialize, Serialize};

/// One component of a display template (row identifier or link description):
/// either a column of the relevant table, or literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplatePart {
    Column { column: String },
    Text { text: String },
}

impl TemplatePart {
    pub fn column(name: impl Into<String>) -> Self {
        TemplatePart::Column {
            column: name.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        TemplatePart::Text { text: text.into() }
    }

    /// The column name, if this part references a column.
    pub fn column_name(&self) -> Option<&str> {
        match self {
            TemplatePart::Column { column } => Some(column),
            TemplatePart::Text { .. } => None,
        }
    }
}

/// A directional reference from a source column to a column in another table.
///
/// `parent` marks the destination table as the logical parent of the source
/// table, which is what enables cascade deletion of the source rows when the
/// destination row goes away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    to_table: String,
    to_column: String,
    #[serde(default)]
    parent: bool,
    /// Columns/literals from the destination table used to describe a
    /// destination row in choosers and identifiers.
    #[serde(default)]
    description: Vec<TemplatePart>,
}

impl Link {
    pub fn new(
        to_table: impl Into<String>,
        to_column: impl Into<String>,
        parent: bool,
        description: Vec<TemplatePart>,
    ) -> Self {
        Link {
            to_table: to_table.into(),
            to_column: to_column.into(),
            parent,
            description,
        }
    }

    pub fn to_table(&self) -> &str {
        &self.to_table
    }

    pub fn to_column(&self) -> &str {
        &self.to_column
    }

    pub fn is_parent(&self) -> bool {
        self.parent
    }

    pub fn description(&self) -> &[TemplatePart] {
        &self.description
    }

    pub fn set_description(&mut self, description: Vec<TemplatePart>) {
        self.description = description;
    }

    /// Number of column components in the description.
    pub fn description_column_count(&self) -> usize {
        self.description
            .iter()
            .filter(|p| p.column_name().is_some())
            .count()
    }
}

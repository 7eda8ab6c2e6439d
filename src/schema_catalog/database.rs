//! The database: an ordered collection of table metadata
//!
//! There is no process-wide schema state; every operation takes the
//! `Database` it works on explicitly. Mutation is single-owner: the request
//! performing a schema edit holds the `Database` exclusively for the
//! duration, and persistence is a whole-file overwrite with no concurrency
//! check (two simultaneous schema edits clobber each other).

use indexmap::IndexMap;
use std::path::Path;

use super::config::SchemaDefinition;
use super::errors::SchemaError;
use super::link::Link;
use super::table::Table;
use super::warnings::{SeverReason, ValidationWarning};

/// A parent link into a table, seen from the parent's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildLink {
    /// The dependent table holding the linking column.
    pub child_table: String,
    /// The linking column on the dependent table.
    pub from_column: String,
    /// The destination column on the parent table.
    pub to_column: String,
}

/// The outcome of a column removal: whether the column went away, plus any
/// non-fatal findings (severed links, emptied order lists).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRemoval {
    pub removed: bool,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Database {
    name: String,
    tables: IndexMap<String, Table>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Database {
            name: name.into(),
            tables: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Tables in definition order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Add a table, replacing any existing table of the same name.
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name().to_string(), table);
    }

    /// Remove a table, severing links from other tables that point into it.
    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        let removed = self.tables.shift_remove(name)?;
        for table in self.tables.values_mut() {
            let severed: Vec<String> = table
                .links()
                .filter(|(_, link)| link.to_table() == name)
                .map(|(column, _)| column.name().to_string())
                .collect();
            for column in severed {
                if let Some(col) = table.column_mut(&column) {
                    col.set_link(None);
                }
            }
        }
        Some(removed)
    }

    // ========================================================================
    // Link graph queries
    // ========================================================================

    /// Tables that link into `table` with a parent link (its children for
    /// cascade purposes).
    pub fn children_of(&self, table: &str) -> Vec<&Table> {
        self.tables
            .values()
            .filter(|t| {
                t.link_to(table)
                    .and_then(|c| c.link())
                    .map(|l| l.is_parent())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// All parent links into `table`, one entry per linking column.
    pub fn child_links_of(&self, table: &str) -> Vec<ChildLink> {
        let mut links = Vec::new();
        for t in self.tables.values() {
            for (column, link) in t.links() {
                if link.to_table() == table && link.is_parent() {
                    links.push(ChildLink {
                        child_table: t.name().to_string(),
                        from_column: column.name().to_string(),
                        to_column: link.to_column().to_string(),
                    });
                }
            }
        }
        links
    }

    // ========================================================================
    // Column removal
    // ========================================================================

    /// Remove a column from a table.
    ///
    /// Fails silently (`removed == false`, no mutation) when the column is
    /// part of the table's primary key. Otherwise the column disappears from
    /// the table's ordering lists, identifier template and indices, and
    /// links elsewhere in the schema are adjusted: a link whose destination
    /// was the removed column is severed, and a link whose description
    /// loses its only column is severed too. Each severing is reported as a
    /// warning, not an error.
    pub fn remove_column(&mut self, table: &str, column: &str) -> Result<ColumnRemoval, SchemaError> {
        let target = self
            .tables
            .get(table)
            .ok_or_else(|| SchemaError::UnknownTable(table.to_string()))?;
        if target.column(column).is_none() {
            return Err(SchemaError::unknown_column(table, column));
        }
        if target.primary_key().iter().any(|n| n == column) {
            return Ok(ColumnRemoval {
                removed: false,
                warnings: Vec::new(),
            });
        }

        let mut warnings = Vec::new();

        // adjust links across the whole schema before the column goes away
        for other in self.tables.values_mut() {
            let mut severed: Vec<(String, SeverReason)> = Vec::new();
            let mut trimmed: Vec<(String, Link)> = Vec::new();
            for (link_column, link) in other.links() {
                if link.to_table() != table {
                    continue;
                }
                if link.to_column() == column {
                    severed.push((link_column.name().to_string(), SeverReason::TargetRemoved));
                    continue;
                }
                let description: Vec<_> = link
                    .description()
                    .iter()
                    .filter(|p| p.column_name() != Some(column))
                    .cloned()
                    .collect();
                if description.len() == link.description().len() {
                    continue;
                }
                if description.iter().all(|p| p.column_name().is_none()) {
                    severed.push((
                        link_column.name().to_string(),
                        SeverReason::DescriptionEmptied,
                    ));
                } else {
                    let mut adjusted = link.clone();
                    adjusted.set_description(description);
                    trimmed.push((link_column.name().to_string(), adjusted));
                }
            }
            for (name, reason) in severed {
                if let Some(col) = other.column_mut(&name) {
                    col.set_link(None);
                }
                let warning = ValidationWarning::LinkSevered {
                    from_table: other.name().to_string(),
                    from_column: name,
                    reason,
                };
                log::warn!("{}", warning);
                warnings.push(warning);
            }
            for (name, link) in trimmed {
                if let Some(col) = other.column_mut(&name) {
                    col.set_link(Some(link));
                }
            }
        }

        let target = self.tables.get_mut(table).expect("checked above");
        warnings.extend(target.strip_column_references(column));
        let removed = target.remove_column_entry(column);
        Ok(ColumnRemoval { removed, warnings })
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        let definition: SchemaDefinition = serde_yaml::from_str(yaml)
            .map_err(|e| SchemaError::DefinitionParse(e.to_string()))?;
        definition.into_database()
    }

    pub fn to_yaml_string(&self) -> Result<String, SchemaError> {
        serde_yaml::to_string(&self.to_definition())
            .map_err(|e| SchemaError::DefinitionParse(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let definition: SchemaDefinition = serde_json::from_str(json)
            .map_err(|e| SchemaError::DefinitionParse(e.to_string()))?;
        definition.into_database()
    }

    pub fn to_json_string(&self) -> Result<String, SchemaError> {
        serde_json::to_string_pretty(&self.to_definition())
            .map_err(|e| SchemaError::DefinitionParse(e.to_string()))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SchemaError::DefinitionRead(e.to_string()))?;
        Self::from_yaml_str(&text)
    }

    /// Persist the schema, overwriting the whole file.
    pub fn save_yaml_file(&self, path: impl AsRef<Path>) -> Result<(), SchemaError> {
        let text = self.to_yaml_string()?;
        std::fs::write(path.as_ref(), text).map_err(|e| SchemaError::DefinitionRead(e.to_string()))
    }

    pub fn to_definition(&self) -> SchemaDefinition {
        SchemaDefinition::from_database(self)
    }
}

//! Schema definition documents
//!
//! This module handles loading and saving of schema definitions from YAML
//! or JSON. The definition structs mirror the document structure; building
//! the runtime [`Database`] validates structural invariants (every
//! referenced column resolves, link destinations exist, enum columns have
//! choices) and generates masks where absent.
//!
//! Schemas are defined in YAML with the following structure:
//!
//! ```yaml
//! name: shop
//! tables:
//!   - name: Orders
//!     access: admin
//!     cascade_delete: true
//!     allow: all,~del
//!     columns:
//!       - name: id
//!         kind: integer
//!         sql_type: INT
//!         mandatory: true
//!       - name: customer_id
//!         kind: integer
//!         sql_type: INT
//!         link:
//!           to_table: Customer
//!           to_column: id
//!           parent: true
//!           description:
//!             - column: name
//!       - name: seq
//!         kind: ordernum
//!         sql_type: INT
//!     view_order:
//!       - column: customer_id
//!         dir: asc
//!       - column: seq
//!         dir: asc
//!     indices:
//!       - name: PRIMARY KEY
//!         columns: [id]
//!     row_identifier:
//!       - column: customer_id
//!       - text: " / "
//!       - column: seq
//! ```
//!
//! Saving is a whole-file overwrite; the document written by
//! [`Database::to_yaml_string`] reparses to an identical model.
//!
//! [`Database::to_yaml_string`]: super::database::Database::to_yaml_string

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::{Column, ColumnKind};
use super::database::Database;
use super::errors::SchemaError;
use super::link::TemplatePart;
use super::table::{
    AccessLevel, Action, DisplayStyle, InsertPosition, OrderDirection, OrderList, Table,
};

/// Root of a schema definition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}

/// One table in a schema definition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(default = "default_true")]
    pub display: bool,
    #[serde(default)]
    pub display_style: DisplayStyle,
    #[serde(default = "default_true")]
    pub cascade_delete: bool,
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
    #[serde(default, rename = "static")]
    pub static_table: bool,
    #[serde(default)]
    pub joiner: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    /// Comma-separated action list. Supported values: `add`, `edit`, `del`,
    /// `export`, `all`; prefix with `~` to invert (e.g. `all,~del`).
    #[serde(default = "default_allow")]
    pub allow: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub view_order: Vec<OrderItemDefinition>,
    #[serde(default)]
    pub search: Vec<String>,
    #[serde(default)]
    pub indices: Vec<IndexDefinition>,
    #[serde(default)]
    pub row_identifier: Vec<TemplatePart>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub alt_pages: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub alt_buttons: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDefinition {
    pub column: String,
    #[serde(default)]
    pub dir: OrderDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    #[serde(default)]
    pub name: String,
    pub columns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_allow() -> String {
    "all".to_string()
}

/// Parse an action list like `all,~del` into the enabled set.
/// Unknown tokens are skipped with a warning.
pub fn parse_allowed_actions(allow: &str) -> Vec<Action> {
    let mut enabled: Vec<Action> = Vec::new();
    for raw in allow.split(',') {
        let mut token = raw.trim().to_lowercase();
        if token.is_empty() {
            continue;
        }
        let mut value = true;
        if let Some(stripped) = token.strip_prefix('~') {
            token = stripped.to_string();
            value = false;
        }
        if token == "all" {
            enabled.clear();
            if value {
                enabled.extend(Action::ALL);
            }
            continue;
        }
        match Action::from_str(&token) {
            Some(action) => {
                if value {
                    if !enabled.contains(&action) {
                        enabled.push(action);
                    }
                } else {
                    enabled.retain(|a| *a != action);
                }
            }
            None => log::warn!("Ignoring unknown action token '{}'", raw.trim()),
        }
    }
    enabled
}

fn actions_to_allow(actions: &[Action]) -> String {
    if Action::ALL.iter().all(|a| actions.contains(a)) {
        return "all".to_string();
    }
    actions
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

impl SchemaDefinition {
    /// Build the runtime model, validating structural invariants.
    pub fn into_database(self) -> Result<Database, SchemaError> {
        let mut db = Database::new(&self.name);

        for def in self.tables {
            if db.table(&def.name).is_some() {
                return Err(SchemaError::InvalidDefinition(format!(
                    "duplicate table name `{}`",
                    def.name
                )));
            }
            let mut table = Table::new(&def.name);
            table.set_english_name(def.english_name);
            table.set_single_name(def.single_name);
            table.set_comments(def.comments);
            table.set_access_level(def.access);
            table.set_display(def.display);
            table.set_display_style(def.display_style);
            table.set_cascade_delete(def.cascade_delete);
            table.set_confirm_delete(def.confirm_delete);
            table.set_static(def.static_table);
            table.set_joiner(def.joiner);
            if let Some(mask) = def.mask {
                table.set_mask(mask);
            }
            table.set_all_allowed(false);
            for action in parse_allowed_actions(&def.allow) {
                table.set_allowed(action, true);
            }

            for mut column in def.columns {
                if table.column(column.name()).is_some() {
                    return Err(SchemaError::invalid_definition_with_context(
                        format!("duplicate column name `{}`", column.name()),
                        format!("table `{}`", def.name),
                    ));
                }
                if let ColumnKind::Enum { choices } = column.kind() {
                    if choices.is_empty() {
                        return Err(SchemaError::invalid_definition_with_context(
                            format!("enum column `{}` has no choices", column.name()),
                            format!("table `{}`", def.name),
                        ));
                    }
                    // enum values always have to be one of the choices
                    column.set_mandatory(true);
                }
                table.add_column(column, InsertPosition::End);
            }

            for index in def.indices {
                if !table.add_index(&index.name, index.columns.clone()) {
                    return Err(SchemaError::InvalidIndex(format!(
                        "index `{}` on table `{}` (columns: {})",
                        index.name,
                        def.name,
                        index.columns.join(", ")
                    )));
                }
            }
            for item in def.view_order {
                table.add_to_order(OrderList::View, &item.column, item.dir);
            }
            for column in def.search {
                table.add_to_order(OrderList::Search, &column, OrderDirection::Asc);
            }
            table.set_row_identifier(def.row_identifier);
            for (name, target) in def.alt_pages {
                table.set_alt_page(name, target);
            }
            for (name, label) in def.alt_buttons {
                table.set_alt_button(name, label);
            }

            table.validate()?;
            db.add_table(table);
        }

        validate_links(&db)?;
        Ok(db)
    }

    /// The exact inverse of [`SchemaDefinition::into_database`].
    pub fn from_database(db: &Database) -> Self {
        let tables = db
            .tables()
            .map(|table| TableDefinition {
                name: table.name().to_string(),
                english_name: table.english_name().map(str::to_string),
                single_name: table.single_name().map(str::to_string),
                comments: table.comments().map(str::to_string),
                access: table.access_level(),
                display: table.display(),
                display_style: table.display_style(),
                cascade_delete: table.cascade_delete(),
                confirm_delete: table.confirm_delete(),
                static_table: table.is_static(),
                joiner: table.is_joiner(),
                mask: Some(table.mask().to_string()),
                allow: actions_to_allow(table.allowed_actions()),
                columns: table.columns().to_vec(),
                view_order: table
                    .view_order()
                    .iter()
                    .map(|(column, dir)| OrderItemDefinition {
                        column: column.clone(),
                        dir: *dir,
                    })
                    .collect(),
                search: table.search_order().to_vec(),
                indices: table
                    .indices()
                    .iter()
                    .filter(|(_, columns)| !columns.is_empty())
                    .map(|(name, columns)| IndexDefinition {
                        name: name.clone(),
                        columns: columns.clone(),
                    })
                    .collect(),
                row_identifier: table.row_identifier().to_vec(),
                alt_pages: table.alt_pages().clone(),
                alt_buttons: table.alt_buttons().clone(),
            })
            .collect();
        SchemaDefinition {
            name: db.name().to_string(),
            tables,
        }
    }
}

/// Check that every link destination and description column resolves.
fn validate_links(db: &Database) -> Result<(), SchemaError> {
    for table in db.tables() {
        for (column, link) in table.links() {
            let context = format!("link from `{}`.`{}`", table.name(), column.name());
            let destination = db.table(link.to_table()).ok_or_else(|| {
                SchemaError::invalid_definition_with_context(
                    format!("unknown destination table `{}`", link.to_table()),
                    context.clone(),
                )
            })?;
            if destination.column(link.to_column()).is_none() {
                return Err(SchemaError::invalid_definition_with_context(
                    format!(
                        "unknown destination column `{}`.`{}`",
                        link.to_table(),
                        link.to_column()
                    ),
                    context.clone(),
                ));
            }
            for part in link.description() {
                if let Some(name) = part.column_name() {
                    if destination.column(name).is_none() {
                        return Err(SchemaError::invalid_definition_with_context(
                            format!(
                                "description references unknown column `{}`.`{}`",
                                link.to_table(),
                                name
                            ),
                            context.clone(),
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}

//! Table metadata: columns, indices, ordering lists, identifier template
//!
//! Structural lists (indices, ordering, identifier template) reference
//! columns by name rather than holding column objects, so a table never
//! owns a reference cycle. Every referenced name must resolve to one of
//! this table's columns; [`Table::validate`] checks the invariant after a
//! definition load.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::{generate_code, Column};
use super::errors::SchemaError;
use super::link::{Link, TemplatePart};
use super::warnings::ValidationWarning;

/// Reserved index name for the primary key.
pub const PRIMARY_KEY: &str = "PRIMARY KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            OrderDirection::Asc => OrderDirection::Desc,
            OrderDirection::Desc => OrderDirection::Asc,
        }
    }
}

/// Who may reach this table in the generated screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    #[default]
    Admin,
    SetupLimited,
    SetupFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    #[default]
    Rows,
    Tree,
}

/// Record actions that can be switched off per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Edit,
    Del,
    Export,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Add, Action::Edit, Action::Del, Action::Export];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Del => "del",
            Action::Export => "export",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Action::Add),
            "edit" => Some(Action::Edit),
            "del" => Some(Action::Del),
            "export" => Some(Action::Export),
            _ => None,
        }
    }
}

/// Where to place a column added to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Start,
    After(usize),
    End,
}

/// How [`Table::add_column`] resolved a column addition. Callers must treat
/// a replacement distinctly from an insertion (the old column's settings are
/// gone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAdded {
    Inserted,
    Replaced,
}

/// Which ordering list an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderList {
    /// How rows are ordered when listing them.
    View,
    /// Which columns searches are offered on.
    Search,
}

/// Metadata for one database table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    english_name: Option<String>,
    single_name: Option<String>,
    comments: Option<String>,
    access_level: AccessLevel,
    display: bool,
    display_style: DisplayStyle,
    cascade_delete: bool,
    confirm_delete: bool,
    static_table: bool,
    joiner: bool,
    mask: String,
    allowed_actions: Vec<Action>,
    columns: Vec<Column>,
    indices: IndexMap<String, Vec<String>>,
    view_order: Vec<(String, OrderDirection)>,
    search_order: Vec<String>,
    row_identifier: Vec<TemplatePart>,
    alt_pages: IndexMap<String, String>,
    alt_buttons: IndexMap<String, String>,
}

impl Table {
    /// Create an empty table with default flags.
    ///
    /// The primary key starts empty so a definition without one can still be
    /// imported; operations that need a key report the absence then.
    pub fn new(name: impl Into<String>) -> Self {
        let mut indices = IndexMap::new();
        indices.insert(PRIMARY_KEY.to_string(), Vec::new());
        Table {
            name: name.into(),
            english_name: None,
            single_name: None,
            comments: None,
            access_level: AccessLevel::default(),
            display: true,
            display_style: DisplayStyle::default(),
            cascade_delete: true,
            confirm_delete: true,
            static_table: false,
            joiner: false,
            mask: generate_code(),
            allowed_actions: Action::ALL.to_vec(),
            columns: Vec::new(),
            indices,
            view_order: Vec::new(),
            search_order: Vec::new(),
            row_identifier: Vec::new(),
            alt_pages: IndexMap::new(),
            alt_buttons: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn english_name(&self) -> Option<&str> {
        self.english_name.as_deref()
    }

    pub fn set_english_name(&mut self, name: Option<String>) {
        self.english_name = name;
    }

    pub fn single_name(&self) -> Option<&str> {
        self.single_name.as_deref()
    }

    pub fn set_single_name(&mut self, name: Option<String>) {
        self.single_name = name;
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn set_comments(&mut self, comments: Option<String>) {
        self.comments = comments;
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub fn set_access_level(&mut self, level: AccessLevel) {
        self.access_level = level;
    }

    pub fn display(&self) -> bool {
        self.display
    }

    pub fn set_display(&mut self, display: bool) {
        self.display = display;
    }

    pub fn display_style(&self) -> DisplayStyle {
        self.display_style
    }

    pub fn set_display_style(&mut self, style: DisplayStyle) {
        self.display_style = style;
    }

    pub fn cascade_delete(&self) -> bool {
        self.cascade_delete
    }

    pub fn set_cascade_delete(&mut self, cascade: bool) {
        self.cascade_delete = cascade;
    }

    pub fn confirm_delete(&self) -> bool {
        self.confirm_delete
    }

    pub fn set_confirm_delete(&mut self, confirm: bool) {
        self.confirm_delete = confirm;
    }

    /// Static tables hold reference data; every mutation to their rows is
    /// recorded in the change log.
    pub fn is_static(&self) -> bool {
        self.static_table
    }

    pub fn set_static(&mut self, is_static: bool) {
        self.static_table = is_static;
    }

    /// A joiner table implements a many-to-many relationship through two
    /// parent links.
    pub fn is_joiner(&self) -> bool {
        self.joiner
    }

    pub fn set_joiner(&mut self, joiner: bool) {
        self.joiner = joiner;
    }

    /// Opaque code used instead of the table name in stored file paths.
    pub fn mask(&self) -> &str {
        &self.mask
    }

    pub fn set_mask(&mut self, mask: impl Into<String>) {
        self.mask = mask.into();
    }

    // ========================================================================
    // Allowed actions
    // ========================================================================

    pub fn allowed(&self, action: Action) -> bool {
        self.allowed_actions.contains(&action)
    }

    pub fn set_allowed(&mut self, action: Action, value: bool) {
        if value {
            if !self.allowed_actions.contains(&action) {
                self.allowed_actions.push(action);
            }
        } else {
            self.allowed_actions.retain(|a| *a != action);
        }
    }

    pub fn set_all_allowed(&mut self, value: bool) {
        self.allowed_actions.clear();
        if value {
            self.allowed_actions.extend(Action::ALL);
        }
    }

    pub fn allowed_actions(&self) -> &[Action] {
        &self.allowed_actions
    }

    // ========================================================================
    // Columns
    // ========================================================================

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name() == name)
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn column_by_position(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    /// Find a file-backed column by its file mask.
    pub fn column_by_mask(&self, mask: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.mask() == Some(mask))
    }

    /// Add a column, or replace an existing one of the same name in place.
    ///
    /// A name collision keeps the column's ordinal position and ignores
    /// `position`; the result tells the caller which happened.
    pub fn add_column(&mut self, mut column: Column, position: InsertPosition) -> ColumnAdded {
        let taken: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.name() != column.name())
            .filter_map(|c| c.mask().map(str::to_string))
            .collect();
        column.ensure_mask(&taken);

        if let Some(existing) = self.column_position(column.name()) {
            self.columns[existing] = column;
            return ColumnAdded::Replaced;
        }
        match position {
            InsertPosition::Start => self.columns.insert(0, column),
            InsertPosition::After(index) => {
                let at = (index + 1).min(self.columns.len());
                self.columns.insert(at, column);
            }
            InsertPosition::End => self.columns.push(column),
        }
        ColumnAdded::Inserted
    }

    /// Move a column after another one, or to the front when `after` is None.
    pub fn reposition_column(&mut self, name: &str, after: Option<&str>) -> Result<(), SchemaError> {
        let from = self
            .column_position(name)
            .ok_or_else(|| SchemaError::unknown_column(&self.name, name))?;
        let column = self.columns.remove(from);
        match after {
            None => self.columns.insert(0, column),
            Some(anchor) => {
                let at = self
                    .column_position(anchor)
                    .ok_or_else(|| SchemaError::unknown_column(&self.name, anchor))?;
                self.columns.insert(at + 1, column);
            }
        }
        Ok(())
    }

    /// Remove the column's entry from the ordering lists and identifier
    /// template. Part of column removal; link severing happens at the
    /// database level where other tables are reachable.
    pub(crate) fn strip_column_references(&mut self, name: &str) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let before = self.view_order.len();
        self.view_order.retain(|(col, _)| col != name);
        if before > 0 && self.view_order.is_empty() {
            warnings.push(ValidationWarning::EmptyViewOrder {
                table: self.name.clone(),
            });
        }
        self.search_order.retain(|col| col != name);
        self.row_identifier
            .retain(|part| part.column_name() != Some(name));
        for columns in self.indices.values_mut() {
            columns.retain(|col| col != name);
        }
        self.indices
            .retain(|idx, columns| idx == PRIMARY_KEY || !columns.is_empty());
        warnings
    }

    pub(crate) fn remove_column_entry(&mut self, name: &str) -> bool {
        match self.column_position(name) {
            Some(position) => {
                self.columns.remove(position);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Indices
    // ========================================================================

    /// Add an index. The primary key requires a non-empty column list; an
    /// empty name is auto-assigned. Returns false (no mutation) for an
    /// invalid definition.
    pub fn add_index(&mut self, name: &str, columns: Vec<String>) -> bool {
        if columns.is_empty() || !columns.iter().all(|c| self.column(c).is_some()) {
            return false;
        }
        if name.eq_ignore_ascii_case(PRIMARY_KEY) {
            self.indices.insert(PRIMARY_KEY.to_string(), columns);
            return true;
        }
        let key = if name.is_empty() {
            format!("index_{}", self.indices.len())
        } else {
            name.to_string()
        };
        self.indices.insert(key, columns);
        true
    }

    pub fn indices(&self) -> &IndexMap<String, Vec<String>> {
        &self.indices
    }

    /// The primary key column names; empty before the table is fully
    /// created.
    pub fn primary_key(&self) -> &[String] {
        self.indices
            .get(PRIMARY_KEY)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The primary key columns, failing when the key is absent or broken.
    pub fn primary_key_columns(&self) -> Result<Vec<&Column>, SchemaError> {
        let names = self.primary_key();
        if names.is_empty() {
            return Err(SchemaError::MissingPrimaryKey(self.name.clone()));
        }
        names
            .iter()
            .map(|n| {
                self.column(n)
                    .ok_or_else(|| SchemaError::unknown_column(&self.name, n))
            })
            .collect()
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// All links made from columns of this table.
    pub fn links(&self) -> impl Iterator<Item = (&Column, &Link)> {
        self.columns.iter().filter_map(|c| c.link().map(|l| (c, l)))
    }

    /// The first column linking to the named table.
    pub fn link_to(&self, table: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.link().map(|l| l.to_table() == table).unwrap_or(false))
    }

    /// For a joiner table: the column linking to the *other* parent.
    pub fn joiner_column(&self, parent_table: &str) -> Result<Option<&Column>, SchemaError> {
        if !self.joiner {
            return Err(SchemaError::InvalidDefinition(format!(
                "Table `{}` is not a joiner table",
                self.name
            )));
        }
        Ok(self
            .columns
            .iter()
            .find(|c| c.link().map(|l| l.to_table() != parent_table).unwrap_or(false)))
    }

    // ========================================================================
    // Ordering lists
    // ========================================================================

    pub fn view_order(&self) -> &[(String, OrderDirection)] {
        &self.view_order
    }

    pub fn search_order(&self) -> &[String] {
        &self.search_order
    }

    pub fn add_to_order(&mut self, list: OrderList, column: &str, direction: OrderDirection) {
        match list {
            OrderList::View => self.view_order.push((column.to_string(), direction)),
            OrderList::Search => self.search_order.push(column.to_string()),
        }
    }

    /// Flip the order direction of a view-order column.
    pub fn change_order_direction(&mut self, column: &str) -> bool {
        for (name, direction) in &mut self.view_order {
            if name == column {
                *direction = direction.flipped();
                return true;
            }
        }
        false
    }

    /// Move an order entry up or down one place. Moving the bottom entry
    /// down removes it from the list entirely, and counts as a failure.
    pub fn move_order_item(&mut self, list: OrderList, index: usize, up: bool) -> bool {
        let len = match list {
            OrderList::View => self.view_order.len(),
            OrderList::Search => self.search_order.len(),
        };
        if index >= len {
            return false;
        }
        if up {
            if index == 0 {
                return false;
            }
            match list {
                OrderList::View => self.view_order.swap(index - 1, index),
                OrderList::Search => self.search_order.swap(index - 1, index),
            }
            true
        } else if index == len - 1 {
            match list {
                OrderList::View => {
                    self.view_order.remove(index);
                }
                OrderList::Search => {
                    self.search_order.remove(index);
                }
            }
            false
        } else {
            match list {
                OrderList::View => self.view_order.swap(index, index + 1),
                OrderList::Search => self.search_order.swap(index, index + 1),
            }
            true
        }
    }

    /// Find the order-number column: the first view-order entry whose column
    /// is an order-number column. The entries before it form the order
    /// scope - rows only count as siblings when those columns match.
    pub fn order_column_with_scope(&self) -> Option<(&str, Vec<&str>)> {
        let mut scope = Vec::new();
        for (name, _) in &self.view_order {
            let column = self.column(name)?;
            if column.is_orderable() {
                return Some((column.name(), scope));
            }
            scope.push(column.name());
        }
        None
    }

    // ========================================================================
    // Row identifier template
    // ========================================================================

    pub fn row_identifier(&self) -> &[TemplatePart] {
        &self.row_identifier
    }

    pub fn set_row_identifier(&mut self, parts: Vec<TemplatePart>) {
        self.row_identifier = parts;
    }

    pub fn add_row_identifier(&mut self, part: TemplatePart) {
        self.row_identifier.push(part);
    }

    // ========================================================================
    // Page/button overrides
    // ========================================================================

    pub fn alt_pages(&self) -> &IndexMap<String, String> {
        &self.alt_pages
    }

    pub fn set_alt_page(&mut self, name: impl Into<String>, target: impl Into<String>) {
        self.alt_pages.insert(name.into(), target.into());
    }

    pub fn unset_alt_page(&mut self, name: &str) {
        self.alt_pages.shift_remove(name);
    }

    pub fn alt_buttons(&self) -> &IndexMap<String, String> {
        &self.alt_buttons
    }

    pub fn set_alt_button(&mut self, name: impl Into<String>, label: impl Into<String>) {
        self.alt_buttons.insert(name.into(), label.into());
    }

    pub fn unset_alt_button(&mut self, name: &str) {
        self.alt_buttons.shift_remove(name);
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check that every column referenced from a structural list exists in
    /// this table. Link destinations are checked at the database level.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (index, columns) in &self.indices {
            for name in columns {
                if self.column(name).is_none() {
                    return Err(SchemaError::invalid_definition_with_context(
                        format!("index `{}` references unknown column `{}`", index, name),
                        format!("table `{}`", self.name),
                    ));
                }
            }
        }
        for (name, _) in &self.view_order {
            if self.column(name).is_none() {
                return Err(SchemaError::invalid_definition_with_context(
                    format!("view order references unknown column `{}`", name),
                    format!("table `{}`", self.name),
                ));
            }
        }
        for name in &self.search_order {
            if self.column(name).is_none() {
                return Err(SchemaError::invalid_definition_with_context(
                    format!("search list references unknown column `{}`", name),
                    format!("table `{}`", self.name),
                ));
            }
        }
        for part in &self.row_identifier {
            if let Some(name) = part.column_name() {
                if self.column(name).is_none() {
                    return Err(SchemaError::invalid_definition_with_context(
                        format!("row identifier references unknown column `{}`", name),
                        format!("table `{}`", self.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

//! Statement value objects
//!
//! Queries are short-lived: built for one operation, rendered, executed
//! through the collaborator, and discarded. They are never persisted.

use super::condition::{Combine, ConditionNode, ConditionTree, SqlLiteral};
use crate::schema_catalog::OrderDirection;

/// A table reference with an optional alias. An empty alias means the
/// table is referenced by its own name; the join resolver assigns aliases
/// lazily when a second join to the same table appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub table: String,
    pub alias: String,
}

impl TableRef {
    pub fn new(table: impl Into<String>) -> Self {
        TableRef {
            table: table.into(),
            alias: String::new(),
        }
    }

    pub fn aliased(table: impl Into<String>, alias: impl Into<String>) -> Self {
        TableRef {
            table: table.into(),
            alias: alias.into(),
        }
    }

    /// The name other clauses should qualify columns with.
    pub fn reference_name(&self) -> &str {
        if self.alias.is_empty() {
            &self.table
        } else {
            &self.alias
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// One join in a SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: TableRef,
    pub kind: JoinKind,
    pub on: ConditionNode,
}

/// One projected field of a SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectField {
    Column {
        /// Table name or join alias; None for the base table.
        table: Option<String>,
        column: String,
        alias: Option<String>,
    },
    /// A raw SQL expression, e.g. a date format call or a CONCAT chooser.
    Expression { sql: String, alias: Option<String> },
}

impl SelectField {
    pub fn column(name: impl Into<String>) -> Self {
        SelectField::Column {
            table: None,
            column: name.into(),
            alias: None,
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        SelectField::Column {
            table: Some(table.into()),
            column: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(self, alias: impl Into<String>) -> Self {
        match self {
            SelectField::Column { table, column, .. } => SelectField::Column {
                table,
                column,
                alias: Some(alias.into()),
            },
            SelectField::Expression { sql, .. } => SelectField::Expression {
                sql,
                alias: Some(alias.into()),
            },
        }
    }

    pub fn expression(sql: impl Into<String>) -> Self {
        SelectField::Expression {
            sql: sql.into(),
            alias: None,
        }
    }
}

/// A SELECT statement under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    base: TableRef,
    fields: Vec<SelectField>,
    joins: Vec<Join>,
    where_clause: ConditionTree,
    order_by: Vec<(String, OrderDirection)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        SelectQuery {
            base: TableRef::new(table),
            fields: Vec::new(),
            joins: Vec::new(),
            where_clause: ConditionTree::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn base(&self) -> &TableRef {
        &self.base
    }

    pub fn fields(&self) -> &[SelectField] {
        &self.fields
    }

    pub fn add_field(&mut self, field: SelectField) {
        self.fields.push(field);
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn joins_mut(&mut self) -> &mut Vec<Join> {
        &mut self.joins
    }

    pub fn add_join(&mut self, join: Join) {
        self.joins.push(join);
    }

    pub fn where_clause(&self) -> &ConditionTree {
        &self.where_clause
    }

    pub fn add_condition(&mut self, condition: impl Into<ConditionNode>, combine: Combine) {
        self.where_clause.add(condition, combine);
    }

    pub fn order_by(&self) -> &[(String, OrderDirection)] {
        &self.order_by
    }

    pub fn add_order_by(&mut self, column: impl Into<String>, direction: OrderDirection) {
        self.order_by.push((column.into(), direction));
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertQuery {
    table: String,
    values: Vec<(String, SqlLiteral)>,
}

impl InsertQuery {
    pub fn new(table: impl Into<String>) -> Self {
        InsertQuery {
            table: table.into(),
            values: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn values(&self) -> &[(String, SqlLiteral)] {
        &self.values
    }

    pub fn set_value(&mut self, column: impl Into<String>, value: SqlLiteral) {
        self.values.push((column.into(), value));
    }
}

/// One SET assignment of an UPDATE statement: a literal value, or raw SQL
/// (for arithmetic like decrementing an order number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValue {
    Literal(SqlLiteral),
    Expression(String),
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQuery {
    table: String,
    assignments: Vec<(String, SetValue)>,
    where_clause: ConditionTree,
    limit: Option<u64>,
}

impl UpdateQuery {
    pub fn new(table: impl Into<String>) -> Self {
        UpdateQuery {
            table: table.into(),
            assignments: Vec::new(),
            where_clause: ConditionTree::new(),
            limit: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn assignments(&self) -> &[(String, SetValue)] {
        &self.assignments
    }

    pub fn set(&mut self, column: impl Into<String>, value: SetValue) {
        self.assignments.push((column.into(), value));
    }

    pub fn where_clause(&self) -> &ConditionTree {
        &self.where_clause
    }

    pub fn add_condition(&mut self, condition: impl Into<ConditionNode>, combine: Combine) {
        self.where_clause.add(condition, combine);
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteQuery {
    table: String,
    where_clause: ConditionTree,
    limit: Option<u64>,
}

impl DeleteQuery {
    pub fn new(table: impl Into<String>) -> Self {
        DeleteQuery {
            table: table.into(),
            where_clause: ConditionTree::new(),
            limit: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn where_clause(&self) -> &ConditionTree {
        &self.where_clause
    }

    pub fn add_condition(&mut self, condition: impl Into<ConditionNode>, combine: Combine) {
        self.where_clause.add(condition, combine);
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }
}

/// Pre-rendered SQL carried as a statement value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawQuery {
    sql: String,
}

impl RawQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        RawQuery { sql: sql.into() }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

//! Cascading record deletion with order-number maintenance
//!
//! Deleting a record is a multi-step algorithm: renumber sibling order
//! values, remove stored files, recurse into child tables through parent
//! links, then delete the row itself. Each step is an isolated statement;
//! unless the transactional option is on, a failure partway leaves earlier
//! side effects in place, so a failed result means "possibly partially
//! applied".

use std::collections::HashSet;

use super::errors::RecordError;
use super::executor::{ChangeLog, FileStore, SqlExecutor};
use crate::schema_catalog::{ColumnKind, Database, SchemaError, Table};
use crate::sql_generator::common::quote_identifier;
use crate::sql_generator::{
    Combine, Comparison, DeleteQuery, Operand, SelectField, SelectQuery, SetValue, SqlLiteral,
    ToSql, UpdateQuery,
};

/// Tracks rows across one cascade, distinguishing a row whose deletion is
/// still in flight (seeing it again means the parent links form a cycle)
/// from one already fully deleted (seeing it again is a legitimate diamond
/// in the link graph, and is skipped).
#[derive(Debug, Default)]
struct DeleteContext {
    in_flight: HashSet<(String, Vec<String>)>,
    completed: HashSet<(String, Vec<String>)>,
}

/// Engine behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Wrap each record deletion in begin/commit on the executor, rolling
    /// back on failure. Leave off for collaborators without transaction
    /// support; deletion then has at-least-partial-failure semantics.
    pub transactional: bool,
}

/// Performs record operations against injected collaborators. Holds the
/// schema for the duration of one request; there is no shared state
/// between engines.
pub struct RecordEngine<'a> {
    pub(crate) db: &'a Database,
    pub(crate) executor: &'a mut dyn SqlExecutor,
    pub(crate) files: &'a mut dyn FileStore,
    pub(crate) changelog: &'a mut dyn ChangeLog,
    pub(crate) options: EngineOptions,
}

impl<'a> RecordEngine<'a> {
    pub fn new(
        db: &'a Database,
        executor: &'a mut dyn SqlExecutor,
        files: &'a mut dyn FileStore,
        changelog: &'a mut dyn ChangeLog,
    ) -> Self {
        RecordEngine {
            db,
            executor,
            files,
            changelog,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Delete several records; returns how many deletions succeeded.
    /// Failures are logged and do not stop the remaining deletions.
    pub fn delete_records(&mut self, table: &str, record_pks: &[Vec<String>]) -> usize {
        let mut deleted = 0;
        for pks in record_pks {
            match self.delete_record(table, pks) {
                Ok(()) => deleted += 1,
                Err(e) => log::warn!("delete from `{}` failed: {}", table, e),
            }
        }
        deleted
    }

    /// Delete one record, its stored files and its child records, keeping
    /// order numbers contiguous.
    ///
    /// `pk_values` must carry exactly one value per primary key column, in
    /// key order; a mismatch is a usage error. With
    /// [`EngineOptions::transactional`] off, a mid-flight failure leaves
    /// the earlier steps applied.
    pub fn delete_record(&mut self, table: &str, pk_values: &[String]) -> Result<(), RecordError> {
        let mut context = DeleteContext::default();
        if !self.options.transactional {
            return self.delete_record_inner(table, pk_values, &mut context);
        }
        self.executor.begin()?;
        let result = self.delete_record_inner(table, pk_values, &mut context);
        match &result {
            Ok(()) => self.executor.commit()?,
            Err(_) => {
                if let Err(e) = self.executor.rollback() {
                    log::warn!("rollback after failed delete also failed: {}", e);
                }
            }
        }
        result
    }

    fn delete_record_inner(
        &mut self,
        table_name: &str,
        pk_values: &[String],
        context: &mut DeleteContext,
    ) -> Result<(), RecordError> {
        let db = self.db;
        let table = db
            .table(table_name)
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_string()))?;
        let pk_names = table.primary_key();
        if pk_names.is_empty() {
            return Err(SchemaError::MissingPrimaryKey(table_name.to_string()).into());
        }
        if pk_names.len() != pk_values.len() {
            return Err(RecordError::KeyArity {
                table: table_name.to_string(),
                expected: pk_names.len(),
                got: pk_values.len(),
            });
        }
        let key = (table_name.to_string(), pk_values.to_vec());
        if context.in_flight.contains(&key) {
            return Err(RecordError::LinkCycle {
                table: table_name.to_string(),
            });
        }
        if context.completed.contains(&key) {
            log::debug!(
                "record `{}` [{}] already deleted in this cascade",
                table_name,
                pk_values.join(", ")
            );
            return Ok(());
        }
        context.in_flight.insert(key.clone());
        log::debug!(
            "deleting record from `{}` with pk [{}]",
            table_name,
            pk_values.join(", ")
        );

        self.renumber_siblings(table, pk_values)?;
        self.remove_stored_files(table, pk_values);
        if table.cascade_delete() {
            self.delete_child_records(table, pk_values, context)?;
        }

        // the row itself, limited to one
        let mut delete = DeleteQuery::new(table.name());
        for (name, value) in pk_names.iter().zip(pk_values) {
            delete.add_condition(
                Comparison::eq(
                    Operand::column(name.as_str()),
                    Operand::literal(SqlLiteral::auto(value.as_str())),
                ),
                Combine::And,
            );
        }
        delete.set_limit(1);
        let sql = delete.to_sql()?;
        self.executor.execute(&sql)?;
        if table.is_static() {
            self.changelog.record(
                table.name(),
                &format!("Deleted row from static table {}", table.name()),
                &sql,
            );
        }
        context.in_flight.remove(&key);
        context.completed.insert(key);
        Ok(())
    }

    /// Close the gap the removed row leaves in its order scope: decrement
    /// the order number of every later sibling. Siblings share the values
    /// of the ordering columns before the order-number column (NULL-aware).
    fn renumber_siblings(&mut self, table: &Table, pk_values: &[String]) -> Result<(), RecordError> {
        let Some((order_column, scope_columns)) = table.order_column_with_scope() else {
            return Ok(());
        };

        let mut current = SelectQuery::new(table.name());
        current.add_field(SelectField::column(order_column));
        for scope in &scope_columns {
            current.add_field(SelectField::column(*scope));
        }
        for (name, value) in table.primary_key().iter().zip(pk_values) {
            current.add_condition(
                Comparison::eq(
                    Operand::column(name.as_str()),
                    Operand::literal(SqlLiteral::auto(value.as_str())),
                ),
                Combine::And,
            );
        }
        let rows = self.executor.query(&current.to_sql()?)?;
        if rows.len() != 1 {
            return Ok(());
        }
        let row = &rows[0];
        let order_value: i64 = row
            .get(order_column)
            .and_then(|v| v.as_deref())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);

        let mut update = UpdateQuery::new(table.name());
        update.set(
            order_column,
            SetValue::Expression(format!("{} - 1", quote_identifier(order_column))),
        );
        update.add_condition(
            Comparison::gt(
                Operand::column(order_column),
                Operand::literal(SqlLiteral::raw(order_value.to_string())),
            ),
            Combine::And,
        );
        for scope in &scope_columns {
            let condition = match row.get(*scope).and_then(|v| v.as_deref()) {
                None => Comparison::is_null(Operand::column(*scope)),
                Some(value) => {
                    let numeric = table
                        .column(scope)
                        .map(|c| c.is_numeric())
                        .unwrap_or(false);
                    let literal = if numeric {
                        SqlLiteral::raw(value)
                    } else {
                        SqlLiteral::text(value)
                    };
                    Comparison::eq(Operand::column(*scope), Operand::literal(literal))
                }
            };
            update.add_condition(condition, Combine::And);
        }
        let sql = update.to_sql()?;
        self.executor.execute(&sql)?;
        if table.is_static() {
            self.changelog.record(
                table.name(),
                &format!("Updated order in static table {}", table.name()),
                &sql,
            );
        }
        Ok(())
    }

    /// Remove the stored file and thumbnail variants for every file-backed
    /// column. Paths are deterministic:
    /// `<storage>/<table mask>.<column mask>.<pk,...>[.<thumbnail>]`.
    /// A missing file is not an error; other failures are logged and do not
    /// stop the deletion.
    fn remove_stored_files(&mut self, table: &Table, pk_values: &[String]) {
        for column in table.columns() {
            let ColumnKind::File {
                storage_location,
                mask,
                thumbnails,
            } = column.kind()
            else {
                continue;
            };
            let mut location = storage_location.clone();
            if !location.ends_with('/') && !location.is_empty() {
                location.push('/');
            }
            let base = format!(
                "{}{}.{}.{}",
                location,
                table.mask(),
                mask.as_deref().unwrap_or_default(),
                pk_values.join(",")
            );
            for thumbnail in thumbnails.keys() {
                let path = format!("{}.{}", base, thumbnail);
                if let Err(e) = self.files.remove_if_exists(&path) {
                    log::warn!("could not remove thumbnail {}: {}", path, e);
                }
            }
            if let Err(e) = self.files.remove_if_exists(&base) {
                log::warn!("could not remove file {}: {}", base, e);
            }
        }
    }

    /// Recurse into every table holding a parent link into this one:
    /// collect the primary keys of the referencing rows, then run the whole
    /// deletion algorithm on each.
    fn delete_child_records(
        &mut self,
        table: &Table,
        pk_values: &[String],
        context: &mut DeleteContext,
    ) -> Result<(), RecordError> {
        let db = self.db;
        for child_link in db.child_links_of(table.name()) {
            let key_position = table
                .primary_key()
                .iter()
                .position(|name| *name == child_link.to_column)
                .ok_or_else(|| RecordError::UnkeyedChildLink {
                    table: table.name().to_string(),
                    column: child_link.to_column.clone(),
                })?;
            let child = db
                .table(&child_link.child_table)
                .ok_or_else(|| SchemaError::UnknownTable(child_link.child_table.clone()))?;
            let child_pk: Vec<String> = child.primary_key().to_vec();
            if child_pk.is_empty() {
                return Err(SchemaError::MissingPrimaryKey(child.name().to_string()).into());
            }

            let mut select = SelectQuery::new(child.name());
            for name in &child_pk {
                select.add_field(SelectField::column(name.as_str()));
            }
            select.add_condition(
                Comparison::eq(
                    Operand::column(child_link.from_column.as_str()),
                    Operand::literal(SqlLiteral::auto(pk_values[key_position].as_str())),
                ),
                Combine::And,
            );
            let rows = self.executor.query(&select.to_sql()?)?;
            for row in rows {
                let child_values: Vec<String> = child_pk
                    .iter()
                    .map(|name| {
                        row.get(name)
                            .and_then(|v| v.clone())
                            .unwrap_or_default()
                    })
                    .collect();
                self.delete_record_inner(&child_link.child_table, &child_values, context)?;
            }
        }
        Ok(())
    }
}

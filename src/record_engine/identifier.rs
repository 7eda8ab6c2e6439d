//! Human-readable row identifiers
//!
//! A table's identifier template mixes literal text with column values,
//! e.g. `[last_name, ", ", first_name]` for a people table. Column values
//! come from one generated SELECT; linked columns pull their value from the
//! destination table's chooser projection through an auto-aliased join.

use super::delete::RecordEngine;
use super::errors::RecordError;
use super::executor::Row;
use crate::schema_catalog::{ColumnKind, Link, SchemaError, TemplatePart};
use crate::sql_generator::common::{
    escape_string, qualified_column, quote_identifier, quote_string,
};
use crate::sql_generator::{
    resolve_join, ColumnRef, Combine, Comparison, Operand, SelectField, SelectQuery, SqlLiteral,
    ToSql,
};

impl<'a> RecordEngine<'a> {
    /// Build the identifier string for one row.
    ///
    /// `primary_key` pairs key column names with values, one per primary
    /// key column; anything else is a usage error. Missing data - the row
    /// gone, a linked row deleted, a NULL value - yields an empty string
    /// for the affected fragment, not an error. A template with no column
    /// components skips the query entirely.
    pub fn build_identifier(
        &mut self,
        table_name: &str,
        primary_key: &[(String, String)],
    ) -> Result<String, RecordError> {
        let db = self.db;
        let table = db
            .table(table_name)
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_string()))?;
        if table.row_identifier().is_empty() {
            return Ok(String::new());
        }
        let pk_names = table.primary_key();
        if pk_names.is_empty() {
            return Err(SchemaError::MissingPrimaryKey(table_name.to_string()).into());
        }
        if primary_key.len() != pk_names.len() {
            return Err(RecordError::KeyArity {
                table: table_name.to_string(),
                expected: pk_names.len(),
                got: primary_key.len(),
            });
        }
        for (name, _) in primary_key {
            if !pk_names.iter().any(|pk| pk == name) {
                return Err(RecordError::NotAKeyColumn {
                    table: table_name.to_string(),
                    column: name.clone(),
                });
            }
        }

        let mut query = SelectQuery::new(table.name());
        for part in table.row_identifier() {
            let Some(column_name) = part.column_name() else {
                continue;
            };
            let column = table
                .column(column_name)
                .ok_or_else(|| SchemaError::unknown_column(table_name, column_name))?;
            let field = if let Some(link) = column.link() {
                // linked values come from the destination's chooser, through
                // a join resolved against whatever the query already holds
                let from = ColumnRef::new(table.name(), column_name);
                let (alias, _) = resolve_join(&mut query, &from, link.to_table(), link.to_column());
                chooser_field(&alias, link).with_alias(column_name)
            } else {
                match column.kind() {
                    ColumnKind::Date { format } | ColumnKind::DateTime { format } => {
                        SelectField::expression(format!(
                            "DATE_FORMAT({}, '{}')",
                            quote_identifier(column_name),
                            escape_string(format)
                        ))
                        .with_alias(column_name)
                    }
                    ColumnKind::Boolean => {
                        let quoted = quote_identifier(column_name);
                        SelectField::expression(format!(
                            "IF({} <=> 1, 'Y', IF({} <=> 0, 'N', 'unknown'))",
                            quoted, quoted
                        ))
                        .with_alias(column_name)
                    }
                    _ => SelectField::column(column_name),
                }
            };
            query.add_field(field);
        }

        let mut row = Row::new();
        if !query.fields().is_empty() {
            for (name, value) in primary_key {
                query.add_condition(
                    Comparison::eq(
                        Operand::column(name.as_str()),
                        Operand::literal(SqlLiteral::auto(value.as_str())),
                    ),
                    Combine::And,
                );
            }
            query.set_limit(1);
            let sql = query.to_sql()?;
            log::debug!("identifier query: {}", sql);
            let rows = self.executor.query(&sql)?;
            if let Some(first) = rows.into_iter().next() {
                row = first;
            }
        }

        let mut output = String::new();
        for part in table.row_identifier() {
            match part {
                TemplatePart::Text { text } => output.push_str(text),
                TemplatePart::Column { column } => {
                    if let Some(Some(value)) = row.get(column) {
                        output.push_str(value);
                    }
                }
            }
        }
        Ok(output)
    }
}

/// The destination table's chooser projection: the value shown when a
/// destination row is offered as a choice. A single-column description
/// projects the column bare; longer descriptions concatenate; an empty
/// description falls back to the destination key itself.
fn chooser_field(alias: &str, link: &Link) -> SelectField {
    let description = link.description();
    if description.is_empty() {
        return SelectField::qualified(alias, link.to_column());
    }
    if let [TemplatePart::Column { column }] = description {
        return SelectField::qualified(alias, column.as_str());
    }
    let items: Vec<String> = description
        .iter()
        .map(|part| match part {
            TemplatePart::Column { column } => qualified_column(alias, column),
            TemplatePart::Text { text } => quote_string(text),
        })
        .collect();
    SelectField::expression(format!("CONCAT({})", items.join(", ")))
}

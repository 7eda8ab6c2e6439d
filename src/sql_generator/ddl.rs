//! CREATE TABLE generation from table metadata

use super::common::{quote_identifier, quote_string};
use super::errors::SqlGeneratorError;
use crate::schema_catalog::{Column, ColumnKind, SqlType, Table};

/// Build a CREATE TABLE statement matching the table's metadata: columns
/// in definition order with NOT NULL for mandatory ones, then the primary
/// key and the remaining indices.
pub fn create_table_sql(table: &Table) -> Result<String, SqlGeneratorError> {
    let mut lines: Vec<String> = table.columns().iter().map(column_definition).collect();

    let pk = table.primary_key();
    if !pk.is_empty() {
        let columns: Vec<String> = pk.iter().map(|c| quote_identifier(c)).collect();
        lines.push(format!("PRIMARY KEY ({})", columns.join(", ")));
    }
    for (name, columns) in table.indices() {
        if name == crate::schema_catalog::PRIMARY_KEY || columns.is_empty() {
            continue;
        }
        let rendered: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
        lines.push(format!(
            "INDEX {} ({})",
            quote_identifier(name),
            rendered.join(", ")
        ));
    }
    if lines.is_empty() {
        return Err(SqlGeneratorError::EmptyFieldList);
    }

    Ok(format!(
        "CREATE TABLE {} (\n    {}\n)",
        quote_identifier(table.name()),
        lines.join(",\n    ")
    ))
}

fn column_definition(column: &Column) -> String {
    let mut sql = format!("{} {}", quote_identifier(column.name()), type_text(column));
    if column.is_mandatory() {
        sql.push_str(" NOT NULL");
    }
    sql
}

fn type_text(column: &Column) -> String {
    if let ColumnKind::Enum { choices } = column.kind() {
        let values: Vec<String> = choices.keys().map(|v| quote_string(v)).collect();
        return format!("ENUM({})", values.join(","));
    }
    match column.sql_size() {
        Some(size) if column.sql_type() != SqlType::Enum => {
            format!("{}({})", column.sql_type().as_str(), size)
        }
        _ => column.sql_type().as_str().to_string(),
    }
}

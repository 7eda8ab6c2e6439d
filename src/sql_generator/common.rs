//! Common utilities for SQL statement rendering

/// Quote an identifier (column name, table name, alias) with backticks.
///
/// Backticks inside the name are doubled, per the MySQL quoting rules.
///
/// # Examples
/// ```
/// use rowforge::sql_generator::common::quote_identifier;
/// assert_eq!(quote_identifier("user_id"), "`user_id`");
/// assert_eq!(quote_identifier("odd`name"), "`odd``name`");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Format a qualified column reference: `alias`.`column`.
///
/// # Examples
/// ```
/// use rowforge::sql_generator::common::qualified_column;
/// assert_eq!(qualified_column("Customer1", "name"), "`Customer1`.`name`");
/// ```
pub fn qualified_column(table_alias: &str, column_name: &str) -> String {
    format!(
        "{}.{}",
        quote_identifier(table_alias),
        quote_identifier(column_name)
    )
}

/// Escape a string value for embedding in a single-quoted SQL literal.
/// Single quotes are doubled (SQL standard) and backslashes doubled.
pub fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "''")
}

/// Quote a string value as a SQL literal.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", escape_string(value))
}

/// Escape LIKE pattern metacharacters in a value, so user text matches
/// literally inside a generated pattern.
pub fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

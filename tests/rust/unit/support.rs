//! Shared fixtures: a scripted SQL executor and schema builders

use rowforge::record_engine::{ExecutionError, FileStore, Row, SqlExecutor};
use rowforge::schema_catalog::Database;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a row from (column, value) pairs; None is SQL NULL.
pub fn row(pairs: &[(&str, Option<&str>)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
        .collect()
}

/// An executor that records every statement and answers SELECTs from a
/// script. A query matches the first scripted response whose needle is a
/// substring of the SQL; unmatched queries return no rows.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Vec<(String, Vec<Row>)>,
    fail_on: Option<String>,
    pub statements: Vec<String>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, needle: &str, rows: Vec<Row>) -> Self {
        self.responses.push((needle.to_string(), rows));
        self
    }

    /// Make any statement containing `needle` fail.
    pub fn fail_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Position of the first recorded statement containing `needle`.
    pub fn position_of(&self, needle: &str) -> Option<usize> {
        self.statements.iter().position(|s| s.contains(needle))
    }

    fn check_failure(&self, sql: &str) -> Result<(), ExecutionError> {
        if let Some(needle) = &self.fail_on {
            if sql.contains(needle.as_str()) {
                return Err(ExecutionError::new(format!("scripted failure for {}", sql)));
            }
        }
        Ok(())
    }
}

impl SqlExecutor for ScriptedExecutor {
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, ExecutionError> {
        self.statements.push(sql.to_string());
        self.check_failure(sql)?;
        for (needle, rows) in &self.responses {
            if sql.contains(needle.as_str()) {
                return Ok(rows.clone());
            }
        }
        Ok(Vec::new())
    }

    fn execute(&mut self, sql: &str) -> Result<u64, ExecutionError> {
        self.statements.push(sql.to_string());
        self.check_failure(sql)?;
        Ok(1)
    }

    fn begin(&mut self) -> Result<(), ExecutionError> {
        self.statements.push("BEGIN".to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ExecutionError> {
        self.statements.push("COMMIT".to_string());
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ExecutionError> {
        self.statements.push("ROLLBACK".to_string());
        Ok(())
    }
}

/// A file store that records removal requests instead of touching disk.
#[derive(Default)]
pub struct RecordingFileStore {
    pub removed: Vec<String>,
}

impl FileStore for RecordingFileStore {
    fn remove_if_exists(&mut self, path: &str) -> Result<(), ExecutionError> {
        self.removed.push(path.to_string());
        Ok(())
    }
}

/// Orders: composite ordering (`customer_id` scope, `seq` order number).
pub fn orders_schema(static_table: bool) -> Database {
    let yaml = format!(
        r#"
name: shop
tables:
  - name: Orders
    static: {}
    columns:
      - name: id
        kind: integer
        sql_type: INT
        mandatory: true
      - name: customer_id
        kind: integer
        sql_type: INT
      - name: seq
        kind: ordernum
        sql_type: INT
    view_order:
      - column: customer_id
        dir: asc
      - column: seq
        dir: asc
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#,
        static_table
    );
    Database::from_yaml_str(&yaml).expect("orders schema loads")
}

/// Customer with cascading Invoice children.
pub fn customer_invoice_schema(cascade: bool) -> Database {
    let yaml = format!(
        r#"
name: shop
tables:
  - name: Customer
    cascade_delete: {}
    columns:
      - name: id
        kind: integer
        sql_type: INT
        mandatory: true
      - name: name
        kind: text
        sql_type: VARCHAR
        sql_size: "255"
    indices:
      - name: PRIMARY KEY
        columns: [id]
  - name: Invoice
    columns:
      - name: id
        kind: integer
        sql_type: INT
        mandatory: true
      - name: customer_id
        kind: integer
        sql_type: INT
        link:
          to_table: Customer
          to_column: id
          parent: true
          description:
            - column: name
    row_identifier:
      - text: "Invoice for "
      - column: customer_id
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#,
        cascade
    );
    Database::from_yaml_str(&yaml).expect("customer/invoice schema loads")
}

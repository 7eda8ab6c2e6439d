//! Cascade delete engine tests: renumbering, child recursion, file
//! cleanup, audit logging and failure semantics.

use rowforge::record_engine::{
    EngineOptions, MemoryChangeLog, NullChangeLog, RecordEngine, RecordError,
};
use rowforge::schema_catalog::Database;

use super::support::{
    customer_invoice_schema, init_logging, orders_schema, row, RecordingFileStore,
    ScriptedExecutor,
};

fn keys(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Three rows share customer 5 with seq 1,2,3; deleting seq=2 must shift
/// seq=3 down to keep the scope contiguous, before the row delete runs.
#[test]
fn test_renumber_within_scope_before_delete() {
    init_logging();
    let db = orders_schema(false);
    let mut executor = ScriptedExecutor::new().respond(
        "SELECT `seq`, `customer_id` FROM `Orders`",
        vec![row(&[("seq", Some("2")), ("customer_id", Some("5"))])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    engine.delete_record("Orders", &keys(&["2"])).unwrap();

    assert_eq!(
        executor.statements,
        vec![
            "SELECT `seq`, `customer_id` FROM `Orders` WHERE `id` = 2".to_string(),
            "UPDATE `Orders` SET `seq` = `seq` - 1 WHERE `seq` > 2 AND `customer_id` = 5"
                .to_string(),
            "DELETE FROM `Orders` WHERE `id` = 2 LIMIT 1".to_string(),
        ]
    );
}

/// A NULL scope value must match via IS NULL, not equality.
#[test]
fn test_renumber_scope_is_null_aware() {
    let db = orders_schema(false);
    let mut executor = ScriptedExecutor::new().respond(
        "SELECT `seq`, `customer_id` FROM `Orders`",
        vec![row(&[("seq", Some("4")), ("customer_id", None)])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    engine.delete_record("Orders", &keys(&["9"])).unwrap();

    assert!(executor.statements.contains(
        &"UPDATE `Orders` SET `seq` = `seq` - 1 WHERE `seq` > 4 AND `customer_id` IS NULL"
            .to_string()
    ));
}

/// When the current row cannot be read back, no renumbering happens.
#[test]
fn test_no_renumber_when_row_missing() {
    let db = orders_schema(false);
    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    engine.delete_record("Orders", &keys(&["2"])).unwrap();

    assert!(!executor.statements.iter().any(|s| s.starts_with("UPDATE")));
    assert!(executor
        .statements
        .contains(&"DELETE FROM `Orders` WHERE `id` = 2 LIMIT 1".to_string()));
}

#[test]
fn test_key_arity_is_a_usage_error() {
    let db = orders_schema(false);
    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let err = engine.delete_record("Orders", &keys(&["1", "2"])).unwrap_err();
    assert_eq!(
        err,
        RecordError::KeyArity {
            table: "Orders".to_string(),
            expected: 1,
            got: 2,
        }
    );
    assert!(executor.statements.is_empty());
}

/// Deleting a cascade-enabled parent removes all referencing child rows
/// before the parent row itself.
#[test]
fn test_cascade_deletes_children_first() {
    init_logging();
    let db = customer_invoice_schema(true);
    let mut executor = ScriptedExecutor::new().respond(
        "FROM `Invoice` WHERE `customer_id` = 5",
        vec![row(&[("id", Some("7"))]), row(&[("id", Some("9"))])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    engine.delete_record("Customer", &keys(&["5"])).unwrap();

    let invoice7 = executor
        .position_of("DELETE FROM `Invoice` WHERE `id` = 7")
        .expect("invoice 7 deleted");
    let invoice9 = executor
        .position_of("DELETE FROM `Invoice` WHERE `id` = 9")
        .expect("invoice 9 deleted");
    let customer = executor
        .position_of("DELETE FROM `Customer` WHERE `id` = 5")
        .expect("customer deleted");
    assert!(invoice7 < customer);
    assert!(invoice9 < customer);
}

/// With the cascade flag off, child rows are left orphaned by design.
#[test]
fn test_cascade_flag_off_leaves_children() {
    let db = customer_invoice_schema(false);
    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    engine.delete_record("Customer", &keys(&["5"])).unwrap();

    assert_eq!(
        executor.statements,
        vec!["DELETE FROM `Customer` WHERE `id` = 5 LIMIT 1".to_string()]
    );
}

/// A cycle of parent links across tables must be detected, not recursed.
#[test]
fn test_parent_link_cycle_is_detected() {
    let yaml = r#"
name: tangled
tables:
  - name: A
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: b_id
        kind: integer
        sql_type: INT
        link:
          to_table: B
          to_column: id
          parent: true
    indices:
      - name: PRIMARY KEY
        columns: [id]
  - name: B
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: a_id
        kind: integer
        sql_type: INT
        link:
          to_table: A
          to_column: id
          parent: true
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#;
    let db = Database::from_yaml_str(yaml).unwrap();
    let mut executor = ScriptedExecutor::new()
        .respond("FROM `B` WHERE `a_id` = 1", vec![row(&[("id", Some("2"))])])
        .respond("FROM `A` WHERE `b_id` = 2", vec![row(&[("id", Some("1"))])]);
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let err = engine.delete_record("A", &keys(&["1"])).unwrap_err();
    assert_eq!(
        err,
        RecordError::LinkCycle {
            table: "A".to_string()
        }
    );
}

/// Stored files and their thumbnail variants are removed through the file
/// store, addressed by table mask, column mask and the key values.
#[test]
fn test_file_backed_columns_are_cleaned_up() {
    let yaml = r#"
name: media
tables:
  - name: Photos
    mask: t4b1e0
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: image
        kind: file
        sql_type: VARCHAR
        storage_location: uploads
        mask: c0lmsk
        thumbnails:
          small: 80x60
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#;
    let db = Database::from_yaml_str(yaml).unwrap();
    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    engine.delete_record("Photos", &keys(&["4"])).unwrap();

    assert_eq!(
        files.removed,
        vec![
            "uploads/t4b1e0.c0lmsk.4.small".to_string(),
            "uploads/t4b1e0.c0lmsk.4".to_string(),
        ]
    );
}

/// Static tables get an audit entry for the renumbering and the delete.
#[test]
fn test_static_table_mutations_are_logged() {
    let db = orders_schema(true);
    let mut executor = ScriptedExecutor::new().respond(
        "SELECT `seq`, `customer_id` FROM `Orders`",
        vec![row(&[("seq", Some("2")), ("customer_id", Some("5"))])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = MemoryChangeLog::new();
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    engine.delete_record("Orders", &keys(&["2"])).unwrap();

    assert_eq!(changelog.entries.len(), 2);
    assert_eq!(
        changelog.entries[0].message,
        "Updated order in static table Orders"
    );
    assert_eq!(
        changelog.entries[1].message,
        "Deleted row from static table Orders"
    );
    assert!(changelog.entries[1].sql.starts_with("DELETE FROM `Orders`"));
}

/// The transactional option brackets the statement sequence with
/// begin/commit, and rolls back when a step fails.
#[test]
fn test_transactional_delete_commits_and_rolls_back() {
    let db = customer_invoice_schema(true);

    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog)
        .with_options(EngineOptions { transactional: true });
    engine.delete_record("Customer", &keys(&["5"])).unwrap();
    assert_eq!(executor.statements.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(executor.statements.last().map(String::as_str), Some("COMMIT"));

    let mut executor = ScriptedExecutor::new().fail_on("DELETE FROM `Customer`");
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog)
        .with_options(EngineOptions { transactional: true });
    assert!(engine.delete_record("Customer", &keys(&["5"])).is_err());
    assert_eq!(
        executor.statements.last().map(String::as_str),
        Some("ROLLBACK")
    );
}

/// Batch deletion keeps going past individual failures and reports how
/// many records went through.
#[test]
fn test_delete_records_counts_successes() {
    let db = customer_invoice_schema(true);
    let mut executor = ScriptedExecutor::new().fail_on("WHERE `id` = 9");
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let deleted = engine.delete_records("Customer", &[keys(&["5"]), keys(&["9"])]);
    assert_eq!(deleted, 1);
}

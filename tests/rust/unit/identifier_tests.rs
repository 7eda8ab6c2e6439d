//! Row identifier resolver tests: template assembly, typed projections,
//! linked choosers and join aliasing.

use rowforge::record_engine::{NullChangeLog, RecordEngine, RecordError};
use rowforge::schema_catalog::Database;

use super::support::{customer_invoice_schema, init_logging, row, RecordingFileStore, ScriptedExecutor};

fn pk(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn person_schema() -> Database {
    let yaml = r#"
name: people
tables:
  - name: Person
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: last_name
        kind: text
        sql_type: VARCHAR
        sql_size: "255"
      - name: first_name
        kind: text
        sql_type: VARCHAR
        sql_size: "255"
    row_identifier:
      - column: last_name
      - text: ", "
      - column: first_name
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#;
    Database::from_yaml_str(yaml).unwrap()
}

#[test]
fn test_identifier_from_columns_and_literals() {
    init_logging();
    let db = person_schema();
    let mut executor = ScriptedExecutor::new().respond(
        "FROM `Person`",
        vec![row(&[
            ("last_name", Some("Doe")),
            ("first_name", Some("Jane")),
        ])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let label = engine.build_identifier("Person", &pk(&[("id", "7")])).unwrap();
    assert_eq!(label, "Doe, Jane");
    assert_eq!(
        executor.statements,
        vec![
            "SELECT `last_name`, `first_name` FROM `Person` WHERE `id` = 7 LIMIT 1".to_string()
        ]
    );
}

/// A deleted or missing row yields empty fragments, not an error.
#[test]
fn test_missing_row_yields_empty_fragments() {
    let db = person_schema();
    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let label = engine.build_identifier("Person", &pk(&[("id", "404")])).unwrap();
    assert_eq!(label, ", ");
}

#[test]
fn test_wrong_key_arity_is_a_usage_error() {
    let db = person_schema();
    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let err = engine
        .build_identifier("Person", &pk(&[("id", "7"), ("extra", "1")]))
        .unwrap_err();
    assert!(matches!(err, RecordError::KeyArity { expected: 1, got: 2, .. }));

    let err = engine
        .build_identifier("Person", &pk(&[("last_name", "Doe")]))
        .unwrap_err();
    assert!(matches!(err, RecordError::NotAKeyColumn { .. }));
}

/// A template with no column components never touches storage.
#[test]
fn test_literal_only_template_skips_query() {
    let yaml = r#"
name: misc
tables:
  - name: Settings
    columns:
      - name: id
        kind: integer
        sql_type: INT
    row_identifier:
      - text: "(site settings)"
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#;
    let db = Database::from_yaml_str(yaml).unwrap();
    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let label = engine.build_identifier("Settings", &pk(&[("id", "1")])).unwrap();
    assert_eq!(label, "(site settings)");
    assert!(executor.statements.is_empty());
}

/// An empty template yields an empty label without validation noise.
#[test]
fn test_empty_template_yields_empty_label() {
    let db = customer_invoice_schema(true);
    let mut executor = ScriptedExecutor::new();
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let label = engine.build_identifier("Customer", &pk(&[("id", "5")])).unwrap();
    assert_eq!(label, "");
    assert!(executor.statements.is_empty());
}

/// Boolean columns project through the three-way Y/N/unknown expression,
/// date columns through their configured display format.
#[test]
fn test_boolean_and_date_projections() {
    let yaml = r#"
name: hr
tables:
  - name: Staff
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: active
        kind: boolean
        sql_type: TINYINT
      - name: hired
        kind: date
        sql_type: DATE
    row_identifier:
      - column: active
      - text: " since "
      - column: hired
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#;
    let db = Database::from_yaml_str(yaml).unwrap();
    let mut executor = ScriptedExecutor::new().respond(
        "FROM `Staff`",
        vec![row(&[
            ("active", Some("Y")),
            ("hired", Some("01/02/2003")),
        ])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let label = engine.build_identifier("Staff", &pk(&[("id", "3")])).unwrap();
    assert_eq!(label, "Y since 01/02/2003");
    assert_eq!(
        executor.statements,
        vec![
            "SELECT IF(`active` <=> 1, 'Y', IF(`active` <=> 0, 'N', 'unknown')) AS `active`, \
             DATE_FORMAT(`hired`, '%d/%m/%Y') AS `hired` FROM `Staff` WHERE `id` = 3 LIMIT 1"
                .to_string()
        ]
    );
}

/// Linked columns resolve a join to the destination and project its
/// chooser, aliased back to the source column name.
#[test]
fn test_linked_column_projects_destination_chooser() {
    let db = customer_invoice_schema(true);
    let mut executor = ScriptedExecutor::new().respond(
        "FROM `Invoice`",
        vec![row(&[("customer_id", Some("ACME Pty Ltd"))])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let label = engine.build_identifier("Invoice", &pk(&[("id", "7")])).unwrap();
    assert_eq!(label, "Invoice for ACME Pty Ltd");
    assert_eq!(
        executor.statements,
        vec![
            "SELECT `Customer1`.`name` AS `customer_id` FROM `Invoice` \
             INNER JOIN `Customer` AS `Customer1` ON `Invoice`.`customer_id` = `Customer1`.`id` \
             WHERE `id` = 7 LIMIT 1"
                .to_string()
        ]
    );
}

/// Two link paths into the same table get distinct aliases within the one
/// identifier query.
#[test]
fn test_two_links_to_same_table_use_distinct_aliases() {
    let yaml = r#"
name: banking
tables:
  - name: Account
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: label
        kind: text
        sql_type: VARCHAR
    indices:
      - name: PRIMARY KEY
        columns: [id]
  - name: Transfer
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: from_account
        kind: integer
        sql_type: INT
        link:
          to_table: Account
          to_column: id
          description:
            - column: label
      - name: to_account
        kind: integer
        sql_type: INT
        link:
          to_table: Account
          to_column: id
          description:
            - column: label
    row_identifier:
      - column: from_account
      - text: " -> "
      - column: to_account
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#;
    let db = Database::from_yaml_str(yaml).unwrap();
    let mut executor = ScriptedExecutor::new().respond(
        "FROM `Transfer`",
        vec![row(&[
            ("from_account", Some("Savings")),
            ("to_account", Some("Cheque")),
        ])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let label = engine.build_identifier("Transfer", &pk(&[("id", "1")])).unwrap();
    assert_eq!(label, "Savings -> Cheque");

    let sql = &executor.statements[0];
    assert!(sql.contains("INNER JOIN `Account` AS `Account1` ON `Transfer`.`from_account` = `Account1`.`id`"));
    assert!(sql.contains("INNER JOIN `Account` AS `Account2` ON `Transfer`.`to_account` = `Account2`.`id`"));
    assert!(sql.contains("`Account1`.`label` AS `from_account`"));
    assert!(sql.contains("`Account2`.`label` AS `to_account`"));
}

/// A multi-part link description concatenates columns and literal text.
#[test]
fn test_multi_part_chooser_concatenates() {
    let yaml = r#"
name: crm
tables:
  - name: Contact
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: last_name
        kind: text
        sql_type: VARCHAR
      - name: first_name
        kind: text
        sql_type: VARCHAR
    indices:
      - name: PRIMARY KEY
        columns: [id]
  - name: Call
    columns:
      - name: id
        kind: integer
        sql_type: INT
      - name: contact_id
        kind: integer
        sql_type: INT
        link:
          to_table: Contact
          to_column: id
          description:
            - column: last_name
            - text: ", "
            - column: first_name
    row_identifier:
      - column: contact_id
    indices:
      - name: PRIMARY KEY
        columns: [id]
"#;
    let db = Database::from_yaml_str(yaml).unwrap();
    let mut executor = ScriptedExecutor::new().respond(
        "FROM `Call`",
        vec![row(&[("contact_id", Some("Doe, Jane"))])],
    );
    let mut files = RecordingFileStore::default();
    let mut changelog = NullChangeLog;
    let mut engine = RecordEngine::new(&db, &mut executor, &mut files, &mut changelog);

    let label = engine.build_identifier("Call", &pk(&[("id", "2")])).unwrap();
    assert_eq!(label, "Doe, Jane");
    assert!(executor.statements[0].contains(
        "SELECT CONCAT(`Contact1`.`last_name`, ', ', `Contact1`.`first_name`) AS `contact_id`"
    ));
}

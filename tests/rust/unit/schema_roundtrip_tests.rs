//! Schema definition round-trip tests: everything the model reads from a
//! definition document must survive serialize + reparse unchanged.

use rowforge::schema_catalog::{
    AccessLevel, Action, ColumnKind, Database, DisplayStyle, OrderDirection, SqlType,
};

const FULL_SCHEMA: &str = r#"
name: intranet
tables:
  - name: Department
    english_name: Departments
    single_name: Department
    comments: Reference data; rarely changes.
    access: setup-limited
    display_style: rows
    cascade_delete: true
    confirm_delete: false
    static: true
    mask: d3p4r7
    allow: all,~del
    columns:
      - name: id
        kind: integer
        sql_type: INT
        mandatory: true
      - name: title
        kind: text
        sql_type: VARCHAR
        sql_size: "120"
        mandatory: true
      - name: kind
        kind: enum
        sql_type: ENUM
        choices:
          ops: Operations
          eng: Engineering
      - name: founded
        kind: date
        sql_type: DATE
        format: "%d/%m/%Y"
    view_order:
      - column: title
        dir: asc
    search: [title]
    indices:
      - name: PRIMARY KEY
        columns: [id]
      - name: by_title
        columns: [title]
    row_identifier:
      - column: title
    alt_pages:
      main: departments_home
  - name: Employee
    access: admin
    display: true
    joiner: false
    mask: e6p10y
    allow: all
    columns:
      - name: id
        kind: integer
        sql_type: INT
        mandatory: true
      - name: department_id
        kind: integer
        sql_type: INT
        link:
          to_table: Department
          to_column: id
          parent: true
          description:
            - column: title
            - text: " dept."
      - name: photo
        kind: file
        sql_type: VARCHAR
        storage_location: staff_photos
        mask: ph0t05
        thumbnails:
          small: 60x60
          medium: 240x240
      - name: active
        kind: boolean
        sql_type: TINYINT
      - name: seq
        kind: ordernum
        sql_type: INT
      - name: started
        kind: datetime
        sql_type: DATETIME
        format: "%d/%m/%Y %H:%i"
    view_order:
      - column: department_id
        dir: asc
      - column: seq
        dir: asc
    indices:
      - name: PRIMARY KEY
        columns: [id]
    row_identifier:
      - column: department_id
      - text: " / "
      - column: seq
    alt_buttons:
      save: Store
"#;

#[test]
fn test_yaml_round_trip_preserves_model() {
    let db = Database::from_yaml_str(FULL_SCHEMA).unwrap();
    let serialized = db.to_yaml_string().unwrap();
    let reparsed = Database::from_yaml_str(&serialized).unwrap();
    assert_eq!(db, reparsed);
}

#[test]
fn test_json_round_trip_preserves_model() {
    let db = Database::from_yaml_str(FULL_SCHEMA).unwrap();
    let serialized = db.to_json_string().unwrap();
    let reparsed = Database::from_json_str(&serialized).unwrap();
    assert_eq!(db, reparsed);
}

#[test]
fn test_save_and_reload_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.yaml");
    let db = Database::from_yaml_str(FULL_SCHEMA).unwrap();
    db.save_yaml_file(&path).unwrap();
    let reloaded = Database::from_yaml_file(&path).unwrap();
    assert_eq!(db, reloaded);
}

#[test]
fn test_loaded_attributes() {
    let db = Database::from_yaml_str(FULL_SCHEMA).unwrap();
    assert_eq!(db.name(), "intranet");
    assert_eq!(db.table_count(), 2);

    let department = db.table("Department").unwrap();
    assert_eq!(department.access_level(), AccessLevel::SetupLimited);
    assert_eq!(department.display_style(), DisplayStyle::Rows);
    assert!(department.is_static());
    assert!(!department.confirm_delete());
    assert_eq!(department.mask(), "d3p4r7");
    assert!(department.allowed(Action::Add));
    assert!(!department.allowed(Action::Del));
    assert_eq!(department.primary_key(), &["id".to_string()]);
    assert_eq!(department.alt_pages().get("main").unwrap(), "departments_home");

    let kind = department.column("kind").unwrap();
    assert_eq!(kind.sql_type(), SqlType::Enum);
    assert!(kind.is_mandatory());
    match kind.kind() {
        ColumnKind::Enum { choices } => {
            assert_eq!(choices.get("ops").unwrap(), "Operations");
            assert_eq!(choices.len(), 2);
        }
        other => panic!("expected enum kind, got {:?}", other),
    }

    let employee = db.table("Employee").unwrap();
    let link = employee.column("department_id").unwrap().link().unwrap();
    assert_eq!(link.to_table(), "Department");
    assert!(link.is_parent());
    assert_eq!(link.description().len(), 2);
    let (order_column, scope) = employee.order_column_with_scope().unwrap();
    assert_eq!(order_column, "seq");
    assert_eq!(scope, vec!["department_id"]);
    assert_eq!(employee.view_order()[0].1, OrderDirection::Asc);

    let photo = employee.column("photo").unwrap();
    assert!(photo.is_file_backed());
    assert_eq!(photo.mask(), Some("ph0t05"));
}

/// Column variant discriminators survive the round trip.
#[test]
fn test_discriminators_survive_round_trip() {
    let db = Database::from_yaml_str(FULL_SCHEMA).unwrap();
    let serialized = db.to_yaml_string().unwrap();
    let reparsed = Database::from_yaml_str(&serialized).unwrap();
    let employee = reparsed.table("Employee").unwrap();
    let kinds: Vec<&str> = employee
        .columns()
        .iter()
        .map(|c| c.kind().discriminator())
        .collect();
    assert_eq!(
        kinds,
        vec!["integer", "integer", "file", "boolean", "ordernum", "datetime"]
    );
}

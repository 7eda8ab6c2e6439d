//! Column metadata and the closed set of column variants

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::link::Link;
use super::sql_types::SqlType;

/// Default display format for date columns.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
/// Default display format for datetime columns.
pub const DEFAULT_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%i";

/// The concrete variant of a column, one per SQL-type family.
///
/// This is a closed set: schema definitions select a variant through the
/// `kind` discriminator, and all runtime behaviour dispatches on the enum,
/// never on the discriminator string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    Decimal,
    Text,
    Boolean,
    Time,
    /// Maintains a dense 1..N sequence among sibling rows; the cascade
    /// delete engine keeps it contiguous.
    #[serde(rename = "ordernum")]
    OrderNumber,
    /// Fixed choice of values; `choices` maps stored value to display label.
    Enum {
        #[serde(default)]
        choices: IndexMap<String, String>,
    },
    /// File-backed column. Stored files are named from the table and column
    /// masks plus the row's primary key; thumbnails are derived variants.
    File {
        storage_location: String,
        #[serde(default)]
        mask: Option<String>,
        #[serde(default)]
        thumbnails: IndexMap<String, String>,
    },
    Date {
        #[serde(default = "default_date_format")]
        format: String,
    },
    #[serde(rename = "datetime")]
    DateTime {
        #[serde(default = "default_datetime_format")]
        format: String,
    },
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_datetime_format() -> String {
    DEFAULT_DATETIME_FORMAT.to_string()
}

impl ColumnKind {
    /// The discriminator string used in schema definitions.
    pub fn discriminator(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Text => "text",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Time => "time",
            ColumnKind::OrderNumber => "ordernum",
            ColumnKind::Enum { .. } => "enum",
            ColumnKind::File { .. } => "file",
            ColumnKind::Date { .. } => "date",
            ColumnKind::DateTime { .. } => "datetime",
        }
    }
}

/// Metadata for one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    #[serde(default)]
    english_name: Option<String>,
    sql_type: SqlType,
    #[serde(default)]
    sql_size: Option<String>,
    #[serde(default)]
    mandatory: bool,
    #[serde(flatten)]
    kind: ColumnKind,
    #[serde(default)]
    link: Option<Link>,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType, kind: ColumnKind) -> Self {
        let mandatory = matches!(kind, ColumnKind::Enum { .. });
        Column {
            name: name.into(),
            english_name: None,
            sql_type,
            sql_size: None,
            mandatory,
            kind,
            link: None,
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

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn sql_size(&self) -> Option<&str> {
        self.sql_size.as_deref()
    }

    pub fn set_sql_size(&mut self, size: Option<String>) {
        self.sql_size = size;
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn set_mandatory(&mut self, mandatory: bool) {
        // enum values always have to be one of the choices
        if matches!(self.kind, ColumnKind::Enum { .. }) {
            self.mandatory = true;
            return;
        }
        self.mandatory = mandatory;
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    pub fn set_link(&mut self, link: Option<Link>) {
        self.link = link;
    }

    pub fn has_link(&self) -> bool {
        self.link.is_some()
    }

    /// Whether values embed into SQL unquoted.
    pub fn is_numeric(&self) -> bool {
        self.sql_type.is_numeric()
    }

    /// Whether this column maintains a dense sibling order sequence.
    pub fn is_orderable(&self) -> bool {
        matches!(self.kind, ColumnKind::OrderNumber)
    }

    /// Whether rows of this column own stored files.
    pub fn is_file_backed(&self) -> bool {
        matches!(self.kind, ColumnKind::File { .. })
    }

    pub fn is_enumerable(&self) -> bool {
        matches!(self.kind, ColumnKind::Enum { .. })
    }

    /// The column's file mask, for file-backed columns.
    pub fn mask(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::File { mask, .. } => mask.as_deref(),
            _ => None,
        }
    }

    /// Assign a file mask if the column is file-backed and has none yet.
    /// The mask must be unique among this table's columns; `taken` holds the
    /// masks already in use.
    pub fn ensure_mask(&mut self, taken: &[String]) {
        if let ColumnKind::File { mask, .. } = &mut self.kind {
            if mask.is_none() {
                let mut code = generate_code();
                while taken.iter().any(|m| m == &code) {
                    code = generate_code();
                }
                *mask = Some(code);
            }
        }
    }
}

/// Generate a 6-character code for table/column masks.
pub(crate) fn generate_code() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..6].to_string()
}

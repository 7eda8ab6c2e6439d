//! SQL type system for column metadata
//!
//! The supported types are the MySQL families the generated screens are
//! built against. Sizes/display widths are kept separately on the column
//! (`sql_size`), so `VARCHAR(255)` is `SqlType::Varchar` with size "255".

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL column type, as stored in schema definitions.
///
/// Serialized as the uppercase SQL keyword (`INT`, `VARCHAR`, ...).
/// Parsing accepts common aliases and is case-insensitive, so
/// hand-written definitions can use `integer` or `bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SqlType {
    Int,
    TinyInt,
    SmallInt,
    MediumInt,
    BigInt,
    Bit,
    Decimal,
    Float,
    Double,
    Char,
    Varchar,
    Binary,
    Varbinary,
    Text,
    TinyText,
    MediumText,
    LongText,
    Blob,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Enum,
    Date,
    DateTime,
    Time,
}

impl SqlType {
    /// Parse a type keyword from a schema definition.
    ///
    /// Case-insensitive; supports common aliases (`integer`, `bool`,
    /// `numeric`, `timestamp`).
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" => Ok(SqlType::Int),
            "tinyint" | "bool" | "boolean" => Ok(SqlType::TinyInt),
            "smallint" => Ok(SqlType::SmallInt),
            "mediumint" => Ok(SqlType::MediumInt),
            "bigint" | "long" => Ok(SqlType::BigInt),
            "bit" => Ok(SqlType::Bit),
            "decimal" | "numeric" => Ok(SqlType::Decimal),
            "float" => Ok(SqlType::Float),
            "double" => Ok(SqlType::Double),
            "char" => Ok(SqlType::Char),
            "varchar" => Ok(SqlType::Varchar),
            "binary" => Ok(SqlType::Binary),
            "varbinary" => Ok(SqlType::Varbinary),
            "text" => Ok(SqlType::Text),
            "tinytext" => Ok(SqlType::TinyText),
            "mediumtext" => Ok(SqlType::MediumText),
            "longtext" => Ok(SqlType::LongText),
            "blob" => Ok(SqlType::Blob),
            "tinyblob" => Ok(SqlType::TinyBlob),
            "mediumblob" => Ok(SqlType::MediumBlob),
            "longblob" => Ok(SqlType::LongBlob),
            "enum" => Ok(SqlType::Enum),
            "date" => Ok(SqlType::Date),
            "datetime" | "timestamp" => Ok(SqlType::DateTime),
            "time" => Ok(SqlType::Time),
            _ => Err(format!("Unknown SQL type: '{}'", s)),
        }
    }

    /// The uppercase SQL keyword for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Int => "INT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::MediumInt => "MEDIUMINT",
            SqlType::BigInt => "BIGINT",
            SqlType::Bit => "BIT",
            SqlType::Decimal => "DECIMAL",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::Binary => "BINARY",
            SqlType::Varbinary => "VARBINARY",
            SqlType::Text => "TEXT",
            SqlType::TinyText => "TINYTEXT",
            SqlType::MediumText => "MEDIUMTEXT",
            SqlType::LongText => "LONGTEXT",
            SqlType::Blob => "BLOB",
            SqlType::TinyBlob => "TINYBLOB",
            SqlType::MediumBlob => "MEDIUMBLOB",
            SqlType::LongBlob => "LONGBLOB",
            SqlType::Enum => "ENUM",
            SqlType::Date => "DATE",
            SqlType::DateTime => "DATETIME",
            SqlType::Time => "TIME",
        }
    }

    /// Whether values of this type embed into SQL without quoting.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::Int
                | SqlType::TinyInt
                | SqlType::SmallInt
                | SqlType::MediumInt
                | SqlType::BigInt
                | SqlType::Bit
                | SqlType::Decimal
                | SqlType::Float
                | SqlType::Double
        )
    }

    /// Whether this is a character/text type.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            SqlType::Char
                | SqlType::Varchar
                | SqlType::Text
                | SqlType::TinyText
                | SqlType::MediumText
                | SqlType::LongText
        )
    }

    /// Whether this is a date/time type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, SqlType::Date | SqlType::DateTime | SqlType::Time)
    }
}

impl TryFrom<String> for SqlType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SqlType::from_str(&s)
    }
}

impl From<SqlType> for String {
    fn from(t: SqlType) -> String {
        t.as_str().to_string()
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Rowforge - schema-metadata engine for generated record management
//!
//! This crate describes relational tables, columns, cross-table links and
//! display ordering, then drives record management from that description:
//! - Schema definitions loaded from and saved to YAML/JSON
//! - Dynamic SQL statement construction (fields, joins, condition trees)
//! - Cascading deletes with order-number renumbering
//! - Human-readable row identifiers assembled through auto-aliased joins

pub mod record_engine;
pub mod schema_catalog;
pub mod sql_generator;

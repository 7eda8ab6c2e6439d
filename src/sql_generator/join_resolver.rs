//! Join resolution and alias generation
//!
//! When a query needs a value from a linked table, the resolver decides
//! whether an existing join can carry it or a new one is required, and
//! generates a collision-free alias for the joined table. The same table
//! may be joined several times within one query (one join per link path),
//! so aliases are numbered: `Customer1`, `Customer2`, ...

use lazy_static::lazy_static;
use regex::Regex;

use super::condition::{Comparison, ConditionNode, Operand};
use super::query::{Join, JoinKind, SelectQuery, TableRef};

lazy_static! {
    /// A valid alias suffix: empty, or a decimal number.
    static ref ALIAS_SUFFIX: Regex = Regex::new(r"^[0-9]*$").unwrap();
}

/// A column reference on the joining side: the qualifier is the base table
/// name or an existing join alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        ColumnRef {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Resolve a join from `from` to `to_table`.`to_column` on `query`.
///
/// Returns the alias the destination table is reachable through, and
/// whether a new join was created. An existing join is reused only on a
/// full match - same destination table *and* the same ON condition; a
/// join to the same table through a different link path always gets a
/// fresh alias.
///
/// Before a second join to a table is added, any existing join to that
/// table still carrying a blank alias is assigned `<table>1`, so every
/// join to a given table ends up consistently aliased.
pub fn resolve_join(
    query: &mut SelectQuery,
    from: &ColumnRef,
    to_table: &str,
    to_column: &str,
) -> (String, bool) {
    let mut next_suffix: u32 = 1;

    // Fix up blank aliases and find the highest numeric suffix in use.
    for join in query.joins_mut() {
        if join.table.table != to_table {
            continue;
        }
        if join.table.alias.is_empty() {
            join.table.alias = format!("{}{}", to_table, next_suffix);
            next_suffix += 1;
        } else if let Some(rest) = join.table.alias.strip_prefix(to_table) {
            if ALIAS_SUFFIX.is_match(rest) {
                let suffix: u32 = rest.parse().unwrap_or(0);
                if next_suffix <= suffix {
                    next_suffix = suffix + 1;
                }
            }
        }
    }

    // Reuse a join only when the link path is identical.
    for join in query.joins() {
        if join.table.table != to_table || join.kind != JoinKind::Inner {
            continue;
        }
        let candidate = join_condition(from, join.table.reference_name(), to_column);
        if join.on == candidate {
            return (join.table.reference_name().to_string(), false);
        }
    }

    let alias = format!("{}{}", to_table, next_suffix);
    let on = join_condition(from, &alias, to_column);
    query.add_join(Join {
        table: TableRef::aliased(to_table, alias.clone()),
        kind: JoinKind::Inner,
        on,
    });
    (alias, true)
}

fn join_condition(from: &ColumnRef, to_alias: &str, to_column: &str) -> ConditionNode {
    Comparison::eq(
        Operand::qualified_column(&from.table, &from.column),
        Operand::qualified_column(to_alias, to_column),
    )
    .into()
}

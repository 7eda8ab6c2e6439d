//! Pure rendering of statement trees to SQL text
//!
//! Rendering is a pure function of the tree: the same statement value
//! always produces the same SQL, with no hidden state. The dialect is the
//! MySQL family (backtick quoting, LIMIT, LIKE-based prefix matching).

use super::common::{escape_like, quote_identifier, quote_string};
use super::condition::{
    CompareOp, Comparison, ConditionNode, IsKeyword, Operand, Rhs, SqlLiteral,
};
use super::errors::SqlGeneratorError;
use super::query::{
    DeleteQuery, InsertQuery, Join, JoinKind, RawQuery, SelectField, SelectQuery, SetValue,
    TableRef, UpdateQuery,
};

/// Convert a statement node to a SQL string.
pub trait ToSql {
    fn to_sql(&self) -> Result<String, SqlGeneratorError>;
}

impl ToSql for SqlLiteral {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        if self.quoted {
            Ok(quote_string(&self.value))
        } else {
            Ok(self.value.clone())
        }
    }
}

impl ToSql for Operand {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        match self {
            Operand::Column { table, column } => Ok(match table {
                Some(table) => format!(
                    "{}.{}",
                    quote_identifier(table),
                    quote_identifier(column)
                ),
                None => quote_identifier(column),
            }),
            Operand::Literal(literal) => literal.to_sql(),
        }
    }
}

impl ToSql for Comparison {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        let lhs = self.lhs.to_sql()?;
        match (self.op, &self.rhs) {
            (CompareOp::Eq, Rhs::One(rhs)) => Ok(format!("{} = {}", lhs, rhs.to_sql()?)),
            (CompareOp::NotEq, Rhs::One(rhs)) => Ok(format!("{} != {}", lhs, rhs.to_sql()?)),
            (CompareOp::Lt, Rhs::One(rhs)) => Ok(format!("{} < {}", lhs, rhs.to_sql()?)),
            (CompareOp::Gt, Rhs::One(rhs)) => Ok(format!("{} > {}", lhs, rhs.to_sql()?)),
            (CompareOp::LtOrEq, Rhs::One(rhs)) => Ok(format!("{} <= {}", lhs, rhs.to_sql()?)),
            (CompareOp::GtOrEq, Rhs::One(rhs)) => Ok(format!("{} >= {}", lhs, rhs.to_sql()?)),
            (CompareOp::Like, Rhs::One(rhs)) => Ok(format!("{} LIKE {}", lhs, rhs.to_sql()?)),
            (CompareOp::NotLike, Rhs::One(rhs)) => {
                Ok(format!("{} NOT LIKE {}", lhs, rhs.to_sql()?))
            }
            (CompareOp::StartsWith, Rhs::One(rhs)) => {
                let pattern = like_pattern_fragment(self.op, rhs)?;
                Ok(format!("{} LIKE '{}%'", lhs, pattern))
            }
            (CompareOp::EndsWith, Rhs::One(rhs)) => {
                let pattern = like_pattern_fragment(self.op, rhs)?;
                Ok(format!("{} LIKE '%{}'", lhs, pattern))
            }
            (CompareOp::Between, Rhs::Range(low, high)) => Ok(format!(
                "{} BETWEEN {} AND {}",
                lhs,
                low.to_sql()?,
                high.to_sql()?
            )),
            (CompareOp::NotBetween, Rhs::Range(low, high)) => Ok(format!(
                "{} NOT BETWEEN {} AND {}",
                lhs,
                low.to_sql()?,
                high.to_sql()?
            )),
            (CompareOp::Is, Rhs::Keyword(keyword)) => Ok(match keyword {
                IsKeyword::Null => format!("{} IS NULL", lhs),
                IsKeyword::NotNull => format!("{} IS NOT NULL", lhs),
            }),
            (CompareOp::In, Rhs::List(items)) => {
                if items.is_empty() {
                    return Err(SqlGeneratorError::EmptyInList);
                }
                let rendered: Result<Vec<String>, _> = items.iter().map(|i| i.to_sql()).collect();
                Ok(format!("{} IN ({})", lhs, rendered?.join(", ")))
            }
            (op, _) => Err(SqlGeneratorError::OperandMismatch {
                operator: op.name(),
                expected: expected_shape(rhs_shape_for(op)),
            }),
        }
    }
}

/// The pattern text for STARTS WITH / ENDS WITH: a literal value with LIKE
/// metacharacters and quotes escaped.
fn like_pattern_fragment(
    op: CompareOp,
    operand: &Operand,
) -> Result<String, SqlGeneratorError> {
    match operand {
        Operand::Literal(literal) => Ok(escape_like(&literal.value).replace('\'', "''")),
        Operand::Column { .. } => Err(SqlGeneratorError::LiteralRequired(op.name())),
    }
}

enum RhsShape {
    One,
    Range,
    List,
    Keyword,
}

fn rhs_shape_for(op: CompareOp) -> RhsShape {
    match op {
        CompareOp::Between | CompareOp::NotBetween => RhsShape::Range,
        CompareOp::In => RhsShape::List,
        CompareOp::Is => RhsShape::Keyword,
        _ => RhsShape::One,
    }
}

fn expected_shape(shape: RhsShape) -> &'static str {
    match shape {
        RhsShape::One => "exactly one",
        RhsShape::Range => "two",
        RhsShape::List => "a list of",
        RhsShape::Keyword => "a null-keyword",
    }
}

impl ToSql for ConditionNode {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        match self {
            ConditionNode::Comparison(leaf) => leaf.to_sql(),
            ConditionNode::And(children) => render_group(children, " AND "),
            ConditionNode::Or(children) => render_group(children, " OR "),
        }
    }
}

fn render_group(children: &[ConditionNode], glue: &str) -> Result<String, SqlGeneratorError> {
    if children.is_empty() {
        return Err(SqlGeneratorError::EmptyConditionGroup);
    }
    let rendered: Result<Vec<String>, _> = children
        .iter()
        .map(|child| {
            let sql = child.to_sql()?;
            Ok(match child {
                // nested combinators keep their own parentheses
                ConditionNode::And(_) | ConditionNode::Or(_) => format!("({})", sql),
                ConditionNode::Comparison(_) => sql,
            })
        })
        .collect();
    Ok(rendered?.join(glue))
}

fn render_table_ref(table: &TableRef) -> String {
    if table.alias.is_empty() {
        quote_identifier(&table.table)
    } else {
        format!(
            "{} AS {}",
            quote_identifier(&table.table),
            quote_identifier(&table.alias)
        )
    }
}

impl ToSql for Join {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        let keyword = match self.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        };
        Ok(format!(
            "{} {} ON {}",
            keyword,
            render_table_ref(&self.table),
            self.on.to_sql()?
        ))
    }
}

impl ToSql for SelectField {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        let (body, alias) = match self {
            SelectField::Column {
                table,
                column,
                alias,
            } => {
                let body = match table {
                    Some(table) => format!(
                        "{}.{}",
                        quote_identifier(table),
                        quote_identifier(column)
                    ),
                    None => quote_identifier(column),
                };
                (body, alias)
            }
            SelectField::Expression { sql, alias } => (sql.clone(), alias),
        };
        Ok(match alias {
            Some(alias) => format!("{} AS {}", body, quote_identifier(alias)),
            None => body,
        })
    }
}

impl ToSql for SelectQuery {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        if self.fields().is_empty() {
            return Err(SqlGeneratorError::EmptyFieldList);
        }
        let fields: Result<Vec<String>, _> = self.fields().iter().map(|f| f.to_sql()).collect();
        let mut sql = format!(
            "SELECT {} FROM {}",
            fields?.join(", "),
            render_table_ref(self.base())
        );
        for join in self.joins() {
            sql.push(' ');
            sql.push_str(&join.to_sql()?);
        }
        if let Some(root) = self.where_clause().root() {
            sql.push_str(" WHERE ");
            sql.push_str(&root.to_sql()?);
        }
        if !self.order_by().is_empty() {
            let items: Vec<String> = self
                .order_by()
                .iter()
                .map(|(column, dir)| format!("{} {}", quote_identifier(column), dir.as_sql()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&items.join(", "));
        }
        if let Some(limit) = self.limit() {
            sql.push_str(&format!(" LIMIT {}", limit));
            if let Some(offset) = self.offset() {
                sql.push_str(&format!(" OFFSET {}", offset));
            }
        }
        Ok(sql)
    }
}

impl ToSql for InsertQuery {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        if self.values().is_empty() {
            return Err(SqlGeneratorError::EmptyValueList);
        }
        let columns: Vec<String> = self
            .values()
            .iter()
            .map(|(column, _)| quote_identifier(column))
            .collect();
        let values: Result<Vec<String>, _> = self
            .values()
            .iter()
            .map(|(_, value)| value.to_sql())
            .collect();
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(self.table()),
            columns.join(", "),
            values?.join(", ")
        ))
    }
}

impl ToSql for UpdateQuery {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        if self.assignments().is_empty() {
            return Err(SqlGeneratorError::EmptySetList);
        }
        let assignments: Result<Vec<String>, _> = self
            .assignments()
            .iter()
            .map(|(column, value)| {
                let rendered = match value {
                    SetValue::Literal(literal) => literal.to_sql()?,
                    SetValue::Expression(sql) => sql.clone(),
                };
                Ok(format!("{} = {}", quote_identifier(column), rendered))
            })
            .collect();
        let mut sql = format!(
            "UPDATE {} SET {}",
            quote_identifier(self.table()),
            assignments?.join(", ")
        );
        if let Some(root) = self.where_clause().root() {
            sql.push_str(" WHERE ");
            sql.push_str(&root.to_sql()?);
        }
        if let Some(limit) = self.limit() {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        Ok(sql)
    }
}

impl ToSql for DeleteQuery {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        let mut sql = format!("DELETE FROM {}", quote_identifier(self.table()));
        if let Some(root) = self.where_clause().root() {
            sql.push_str(" WHERE ");
            sql.push_str(&root.to_sql()?);
        }
        if let Some(limit) = self.limit() {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        Ok(sql)
    }
}

impl ToSql for RawQuery {
    fn to_sql(&self) -> Result<String, SqlGeneratorError> {
        Ok(self.sql().to_string())
    }
}

//! Boolean condition trees for generated statements
//!
//! A condition tree node is either a leaf comparison or an AND/OR
//! combinator over child nodes. Leaves compare a column or literal against
//! a right-hand side whose shape depends on the operator: one operand, a
//! range (BETWEEN), a list (IN), or a NULL keyword (IS).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Bare unsigned integers embed into SQL without quoting.
    static ref BARE_INTEGER: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// A literal value with its quoting requirement.
///
/// `quoted` distinguishes string values (escaped and single-quoted at
/// render time) from raw SQL text embedded verbatim (numbers, expressions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLiteral {
    pub value: String,
    pub quoted: bool,
}

impl SqlLiteral {
    /// A string value, quoted and escaped at render time.
    pub fn text(value: impl Into<String>) -> Self {
        SqlLiteral {
            value: value.into(),
            quoted: true,
        }
    }

    /// Raw SQL text embedded without quoting.
    pub fn raw(value: impl Into<String>) -> Self {
        SqlLiteral {
            value: value.into(),
            quoted: false,
        }
    }

    /// Quote unless the value is a bare integer. This is how primary key
    /// values coming in as strings are embedded.
    pub fn auto(value: impl Into<String>) -> Self {
        let value = value.into();
        let quoted = !BARE_INTEGER.is_match(&value);
        SqlLiteral { value, quoted }
    }
}

/// One side of a comparison: a (possibly qualified) column or a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Column {
        /// Table name or join alias; None for the statement's base table.
        table: Option<String>,
        column: String,
    },
    Literal(SqlLiteral),
}

impl Operand {
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column {
            table: None,
            column: name.into(),
        }
    }

    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Operand::Column {
            table: Some(table.into()),
            column: name.into(),
        }
    }

    pub fn literal(literal: SqlLiteral) -> Self {
        Operand::Literal(literal)
    }
}

/// Comparison operators, one per supported search condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Like,
    Eq,
    StartsWith,
    EndsWith,
    Between,
    Lt,
    Gt,
    LtOrEq,
    GtOrEq,
    NotLike,
    NotEq,
    Is,
    In,
    NotBetween,
}

impl CompareOp {
    pub fn name(&self) -> &'static str {
        match self {
            CompareOp::Like => "LIKE",
            CompareOp::Eq => "=",
            CompareOp::StartsWith => "STARTS WITH",
            CompareOp::EndsWith => "ENDS WITH",
            CompareOp::Between => "BETWEEN",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::LtOrEq => "<=",
            CompareOp::GtOrEq => ">=",
            CompareOp::NotLike => "NOT LIKE",
            CompareOp::NotEq => "!=",
            CompareOp::Is => "IS",
            CompareOp::In => "IN",
            CompareOp::NotBetween => "NOT BETWEEN",
        }
    }
}

/// The IS operator's keyword operand. No type coercion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsKeyword {
    Null,
    NotNull,
}

/// Right-hand side of a comparison. The shape must match the operator;
/// rendering reports a mismatch instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rhs {
    One(Operand),
    /// BETWEEN / NOT BETWEEN carry two operands.
    Range(Operand, Operand),
    /// IN carries a list.
    List(Vec<Operand>),
    /// IS carries `null` / `not null`.
    Keyword(IsKeyword),
}

/// A leaf comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub lhs: Operand,
    pub op: CompareOp,
    pub rhs: Rhs,
}

impl Comparison {
    pub fn new(lhs: Operand, op: CompareOp, rhs: Rhs) -> Self {
        Comparison { lhs, op, rhs }
    }

    pub fn eq(lhs: Operand, rhs: Operand) -> Self {
        Comparison::new(lhs, CompareOp::Eq, Rhs::One(rhs))
    }

    pub fn gt(lhs: Operand, rhs: Operand) -> Self {
        Comparison::new(lhs, CompareOp::Gt, Rhs::One(rhs))
    }

    pub fn is_null(lhs: Operand) -> Self {
        Comparison::new(lhs, CompareOp::Is, Rhs::Keyword(IsKeyword::Null))
    }
}

/// A node in a condition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionNode {
    Comparison(Comparison),
    And(Vec<ConditionNode>),
    Or(Vec<ConditionNode>),
}

impl From<Comparison> for ConditionNode {
    fn from(c: Comparison) -> Self {
        ConditionNode::Comparison(c)
    }
}

/// How a condition accretes onto an existing tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    And,
    Or,
}

/// A growable condition tree, as used for statement WHERE clauses.
///
/// Adding to an empty tree installs the condition as the root; adding with
/// the same combinator as the root appends a child; adding with the other
/// combinator wraps the existing tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionTree {
    root: Option<ConditionNode>,
}

impl ConditionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&ConditionNode> {
        self.root.as_ref()
    }

    pub fn add(&mut self, condition: impl Into<ConditionNode>, combine: Combine) {
        let condition = condition.into();
        self.root = Some(match (self.root.take(), combine) {
            (None, _) => condition,
            (Some(ConditionNode::And(mut children)), Combine::And) => {
                children.push(condition);
                ConditionNode::And(children)
            }
            (Some(ConditionNode::Or(mut children)), Combine::Or) => {
                children.push(condition);
                ConditionNode::Or(children)
            }
            (Some(existing), Combine::And) => ConditionNode::And(vec![existing, condition]),
            (Some(existing), Combine::Or) => ConditionNode::Or(vec![existing, condition]),
        });
    }
}

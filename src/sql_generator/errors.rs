use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SqlGeneratorError {
    #[error("SELECT statement has no fields")]
    EmptyFieldList,
    #[error("INSERT statement has no values")]
    EmptyValueList,
    #[error("UPDATE statement has no SET assignments")]
    EmptySetList,
    #[error("Boolean condition group has no children")]
    EmptyConditionGroup,
    #[error("IN condition has an empty value list")]
    EmptyInList,
    #[error("Operator {operator} requires {expected} right-hand operand(s)")]
    OperandMismatch {
        operator: &'static str,
        expected: &'static str,
    },
    #[error("Operator {0} requires a literal right-hand value")]
    LiteralRequired(&'static str),
}

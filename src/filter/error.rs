use super::catalog::{OpName, ValueCategory};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("no {op} operator for {category} values")]
    OperatorNotFound { category: ValueCategory, op: OpName },

    #[error("malformed clause: {0}")]
    MalformedClause(String),

    #[error("field {key:?}: expected a {expected} value, found {found}")]
    TypeMismatch {
        key: String,
        expected: ValueCategory,
        found: String,
    },
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::catalog::{OpName, ValueCategory};

/// One row of exported table data. Filters never assume a schema beyond the
/// keys they reference.
pub type Record = serde_json::Map<String, Value>;

/// A leaf predicate: apply one catalog operator to one field of a record.
///
/// Persisted views may carry extra UI-only fields (labels, select options)
/// inside the `$filter` body; those are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub category: ValueCategory,
    #[serde(rename = "funcName")]
    pub func_name: OpName,
    pub key: String,
    pub parameter: Value,
}

impl Filter {
    pub fn new(category: ValueCategory, func_name: OpName, key: &str, parameter: Value) -> Self {
        Self {
            category,
            func_name,
            key: key.to_string(),
            parameter,
        }
    }
}

/// A node in a boolean filter expression tree. The serde representation is
/// the saved-view wire format: `{"$filter": {...}}`, `{"$and": [...]}`,
/// `{"$or": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
    #[serde(rename = "$filter")]
    Filter(Filter),
    #[serde(rename = "$and")]
    And(Vec<Clause>),
    #[serde(rename = "$or")]
    Or(Vec<Clause>),
}

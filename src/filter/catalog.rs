use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clause::Record;
use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueCategory {
    Number,
    String,
    Date,
    Boolean,
    Array,
    Duration,
}

impl ValueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueCategory::Number => "number",
            ValueCategory::String => "string",
            ValueCategory::Date => "date",
            ValueCategory::Boolean => "boolean",
            ValueCategory::Array => "array",
            ValueCategory::Duration => "duration",
        }
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpName {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
}

impl OpName {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpName::Eq => "eq",
            OpName::Neq => "neq",
            OpName::Gt => "gt",
            OpName::Gte => "gte",
            OpName::Lt => "lt",
            OpName::Lte => "lte",
            OpName::Like => "like",
            OpName::NotLike => "notLike",
        }
    }
}

impl fmt::Display for OpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comparison predicate: full record, field key, typed parameter.
pub type OpFn = dyn Fn(&Record, &str, &Value) -> Result<bool, FilterError> + Send + Sync;

/// Maps (category, operator name) pairs to predicates. Built once, read-only
/// afterwards; evaluation borrows it, so tests can run with restricted
/// operator sets.
pub struct Catalog {
    ops: BTreeMap<(ValueCategory, OpName), Box<OpFn>>,
}

const ORDERED_OPS: [OpName; 6] = [
    OpName::Eq,
    OpName::Neq,
    OpName::Gt,
    OpName::Gte,
    OpName::Lt,
    OpName::Lte,
];

impl Catalog {
    pub fn empty() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    /// The full operator table used by the dashboard.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();

        for category in [
            ValueCategory::Number,
            ValueCategory::Date,
            ValueCategory::Duration,
        ] {
            for op in ORDERED_OPS {
                catalog.register(category, op, move |record, key, parameter| {
                    ordered_cmp(category, op, record, key, parameter)
                });
            }
        }

        catalog.register(
            ValueCategory::String,
            OpName::Like,
            |record, key, parameter| string_like(record, key, parameter, false),
        );
        catalog.register(
            ValueCategory::String,
            OpName::NotLike,
            |record, key, parameter| string_like(record, key, parameter, true),
        );

        catalog.register(
            ValueCategory::Boolean,
            OpName::Eq,
            |record, key, parameter| boolean_cmp(record, key, parameter, false),
        );
        catalog.register(
            ValueCategory::Boolean,
            OpName::Neq,
            |record, key, parameter| boolean_cmp(record, key, parameter, true),
        );

        // Array "neq" is intersection-is-empty, not a negated "eq"; both are
        // registered as independent predicates to keep that explicit.
        catalog.register(
            ValueCategory::Array,
            OpName::Eq,
            |record, key, parameter| array_intersects(record, key, parameter, false),
        );
        catalog.register(
            ValueCategory::Array,
            OpName::Neq,
            |record, key, parameter| array_intersects(record, key, parameter, true),
        );

        catalog
    }

    pub fn register<F>(&mut self, category: ValueCategory, op: OpName, func: F)
    where
        F: Fn(&Record, &str, &Value) -> Result<bool, FilterError> + Send + Sync + 'static,
    {
        self.ops.insert((category, op), Box::new(func));
    }

    pub fn lookup(&self, category: ValueCategory, op: OpName) -> Result<&OpFn, FilterError> {
        self.ops
            .get(&(category, op))
            .map(|func| func.as_ref())
            .ok_or(FilterError::OperatorNotFound { category, op })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(key: &str, expected: ValueCategory, value: &Value) -> FilterError {
    FilterError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: json_type(value).to_string(),
    }
}

fn field_value<'a>(
    record: &'a Record,
    key: &str,
    expected: ValueCategory,
) -> Result<&'a Value, FilterError> {
    record.get(key).ok_or_else(|| FilterError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: "no value".to_string(),
    })
}

/// Number, date and duration share one comparison law over a scalar.
fn ordered_cmp(
    category: ValueCategory,
    op: OpName,
    record: &Record,
    key: &str,
    parameter: &Value,
) -> Result<bool, FilterError> {
    let field = scalar(category, key, field_value(record, key, category)?)?;
    let param = scalar(category, key, parameter)?;

    match op {
        OpName::Eq => Ok(field == param),
        OpName::Neq => Ok(field != param),
        OpName::Gt => Ok(field > param),
        OpName::Gte => Ok(field >= param),
        OpName::Lt => Ok(field < param),
        OpName::Lte => Ok(field <= param),
        OpName::Like | OpName::NotLike => Err(FilterError::OperatorNotFound { category, op }),
    }
}

fn scalar(category: ValueCategory, key: &str, value: &Value) -> Result<f64, FilterError> {
    match category {
        ValueCategory::Date => date_scalar(key, value),
        // durations are second counts, so plain numbers either way
        _ => value.as_f64().ok_or_else(|| mismatch(key, category, value)),
    }
}

/// Dates arrive as RFC 3339 strings from exports, `YYYY-MM-DD` from the UI's
/// date picker, or raw epoch milliseconds. All normalize to one timeline.
fn date_scalar(key: &str, value: &Value) -> Result<f64, FilterError> {
    if let Some(n) = value.as_f64() {
        return Ok(n);
    }
    value
        .as_str()
        .and_then(parse_date_millis)
        .map(|millis| millis as f64)
        .ok_or_else(|| mismatch(key, ValueCategory::Date, value))
}

fn parse_date_millis(s: &str) -> Option<i64> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Some(datetime.timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn string_like(
    record: &Record,
    key: &str,
    parameter: &Value,
    negate: bool,
) -> Result<bool, FilterError> {
    let field = field_value(record, key, ValueCategory::String)?;
    let field = field
        .as_str()
        .ok_or_else(|| mismatch(key, ValueCategory::String, field))?;
    let param = parameter
        .as_str()
        .ok_or_else(|| mismatch(key, ValueCategory::String, parameter))?;

    // both sides lower-cased so the match is case-insensitive regardless of
    // how the parameter was entered
    let hit = field.to_lowercase().contains(&param.to_lowercase());
    Ok(hit != negate)
}

fn boolean_cmp(
    record: &Record,
    key: &str,
    parameter: &Value,
    negate: bool,
) -> Result<bool, FilterError> {
    let field = truthy(field_value(record, key, ValueCategory::Boolean)?);
    let param = parameter
        .as_bool()
        .ok_or_else(|| mismatch(key, ValueCategory::Boolean, parameter))?;

    Ok((field == param) != negate)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn array_intersects(
    record: &Record,
    key: &str,
    parameter: &Value,
    want_disjoint: bool,
) -> Result<bool, FilterError> {
    let field = field_value(record, key, ValueCategory::Array)?;
    let field = field
        .as_array()
        .ok_or_else(|| mismatch(key, ValueCategory::Array, field))?;
    let param = parameter
        .as_array()
        .ok_or_else(|| mismatch(key, ValueCategory::Array, parameter))?;

    let overlap = field.iter().any(|item| param.contains(item));
    Ok(overlap != want_disjoint)
}

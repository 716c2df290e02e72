use serde_json::{json, Value};

use super::clause::Clause;
use super::error::FilterError;

/// Serializes a clause tree to the saved-view wire shape. A direct
/// structural mapping, so it cannot fail.
pub fn to_json(clause: &Clause) -> Value {
    match clause {
        Clause::Filter(filter) => json!({
            "$filter": {
                "category": filter.category,
                "funcName": filter.func_name,
                "key": filter.key,
                "parameter": filter.parameter,
            }
        }),
        Clause::And(children) => json!({ "$and": children.iter().map(to_json).collect::<Vec<_>>() }),
        Clause::Or(children) => json!({ "$or": children.iter().map(to_json).collect::<Vec<_>>() }),
    }
}

/// Rebuilds a clause tree from persisted JSON. Anything that is not an
/// object with `$filter`, `$and` or `$or` as its single top-level key is
/// rejected; a corrupt or forward-incompatible view must fail loudly
/// instead of quietly matching everything.
pub fn from_json(value: &Value) -> Result<Clause, FilterError> {
    serde_json::from_value(value.clone()).map_err(|e| FilterError::MalformedClause(e.to_string()))
}

pub fn from_str(s: &str) -> Result<Clause, FilterError> {
    serde_json::from_str(s).map_err(|e| FilterError::MalformedClause(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::catalog::{OpName, ValueCategory};
    use crate::filter::clause::Filter;
    use serde_json::json;

    fn sample_clause() -> Clause {
        Clause::Or(vec![
            Clause::And(vec![
                Clause::Filter(Filter::new(
                    ValueCategory::Number,
                    OpName::Gte,
                    "amount_msat",
                    json!(2000),
                )),
                Clause::Filter(Filter::new(
                    ValueCategory::String,
                    OpName::Like,
                    "status",
                    json!("succeeded"),
                )),
            ]),
            Clause::Filter(Filter::new(
                ValueCategory::Array,
                OpName::Eq,
                "tags",
                json!(["drain", "source"]),
            )),
        ])
    }

    #[test]
    fn test_round_trip() {
        let clause = sample_clause();
        assert_eq!(from_json(&to_json(&clause)).unwrap(), clause);
    }

    #[test]
    fn test_wire_shape_is_exact() {
        let clause = Clause::Filter(Filter::new(
            ValueCategory::Date,
            OpName::Lt,
            "updated_on",
            json!("2023-05-01"),
        ));
        assert_eq!(
            to_json(&clause),
            json!({
                "$filter": {
                    "category": "date",
                    "funcName": "lt",
                    "key": "updated_on",
                    "parameter": "2023-05-01",
                }
            })
        );
    }

    #[test]
    fn test_to_json_matches_serde_representation() {
        // the derived Serialize impl is what embeds clauses in larger view
        // documents; it must agree with to_json
        let clause = sample_clause();
        assert_eq!(to_json(&clause), serde_json::to_value(&clause).unwrap());
    }

    #[test]
    fn test_nested_clause_from_str() {
        let clause = from_str(
            r#"{"$or":[
                {"$and":[
                    {"$filter":{"category":"string","funcName":"like","key":"status","parameter":"succeeded"}},
                    {"$filter":{"category":"number","funcName":"gte","key":"amount_msat","parameter":2000}}
                ]},
                {"$filter":{"category":"boolean","funcName":"eq","key":"private","parameter":true}}
            ]}"#,
        )
        .unwrap();

        match clause {
            Clause::Or(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(&children[0], Clause::And(inner) if inner.len() == 2));
            }
            other => panic!("expected $or clause, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_top_level_key_is_malformed() {
        let err = from_json(&json!({ "$not": [] })).err().unwrap();
        assert!(matches!(err, FilterError::MalformedClause(_)));
    }

    #[test]
    fn test_two_top_level_keys_are_malformed() {
        let err = from_str(r#"{"$and":[],"$or":[]}"#).err().unwrap();
        assert!(matches!(err, FilterError::MalformedClause(_)));
    }

    #[test]
    fn test_non_object_is_malformed() {
        for doc in ["[]", "42", "\"$and\"", "{}"] {
            assert!(
                matches!(from_str(doc), Err(FilterError::MalformedClause(_))),
                "{} should not deserialize",
                doc
            );
        }
    }

    #[test]
    fn test_filter_body_missing_fields_is_malformed() {
        let err = from_json(&json!({
            "$filter": { "category": "number", "funcName": "eq" }
        }))
        .err()
        .unwrap();
        assert!(matches!(err, FilterError::MalformedClause(_)));
    }

    #[test]
    fn test_unknown_category_is_malformed() {
        let err = from_json(&json!({
            "$filter": { "category": "uuid", "funcName": "eq", "key": "id", "parameter": 1 }
        }))
        .err()
        .unwrap();
        assert!(matches!(err, FilterError::MalformedClause(_)));
    }

    #[test]
    fn test_filter_body_ui_fields_are_ignored() {
        // views saved by the dashboard carry form state alongside the filter
        let clause = from_json(&json!({
            "$filter": {
                "category": "number",
                "funcName": "eq",
                "key": "capacity",
                "parameter": 5,
                "label": "Capacity",
                "selectOptions": [],
            }
        }))
        .unwrap();

        assert_eq!(
            clause,
            Clause::Filter(Filter::new(
                ValueCategory::Number,
                OpName::Eq,
                "capacity",
                json!(5)
            ))
        );
    }
}

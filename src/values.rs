use serde_json::Value;
use std::collections::HashMap;

use crate::filter::Record;

pub fn collect_values(records: &[Record], property: &str) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Some(value) = record.get(property) else {
            continue;
        };

        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = value_to_string(item) {
                        *counts.entry(s).or_default() += 1;
                    }
                }
            }
            _ => {
                if let Some(s) = value_to_string(value) {
                    *counts.entry(s).or_default() += 1;
                }
            }
        }
    }

    counts
}

pub fn format_values(counts: HashMap<String, usize>, show_count: bool) -> Vec<String> {
    let mut items: Vec<(String, usize)> = counts.into_iter().collect();

    if show_count {
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        items
            .into_iter()
            .map(|(val, count)| format!("{}: {}", val, count))
            .collect()
    } else {
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items.into_iter().map(|(val, _)| val).collect()
    }
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

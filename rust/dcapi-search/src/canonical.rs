//! Canonical JSON.
//!
//! Object keys are sorted recursively before serialization, so two values
//! with the same content always produce the same bytes regardless of the
//! order keys were inserted or parsed in.

use serde_json::{Map, Value};

/// Rebuild `value` with every object's keys in ascending order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonicalize(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Serialize `value` canonically, without insignificant whitespace.
pub fn to_canonical_string(value: &Value) -> String {
    canonicalize(value).to_string()
}

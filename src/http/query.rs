//! Query-parameter serialization
//!
//! Flattens a JSON object into ordered `key=value` pairs.

use crate::types::{ArrayFormat, JsonObject, QueryPairs};
use serde_json::Value;

/// Serialization policy for query parameters
///
/// - `null` values are skipped
/// - booleans and numbers use their JSON text
/// - arrays follow [`ArrayFormat`]
/// - nested objects become `key[sub]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuerySerializer {
    /// How arrays are written
    pub array_format: ArrayFormat,
}

impl QuerySerializer {
    /// Create a serializer with the given array format
    pub fn new(array_format: ArrayFormat) -> Self {
        Self { array_format }
    }

    /// Serialize a query mapping into pairs
    pub fn serialize(&self, params: &JsonObject) -> QueryPairs {
        let mut pairs = Vec::with_capacity(params.len());
        for (key, value) in params {
            self.push(&mut pairs, key.clone(), value);
        }
        pairs
    }

    fn push(&self, pairs: &mut QueryPairs, key: String, value: &Value) {
        match value {
            Value::Null => {}
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                if let Some(text) = scalar_text(value) {
                    pairs.push((key, text));
                }
            }
            Value::Array(items) => match self.array_format {
                ArrayFormat::Repeat => {
                    for item in items {
                        self.push(pairs, key.clone(), item);
                    }
                }
                ArrayFormat::Brackets => {
                    for item in items {
                        self.push(pairs, format!("{key}[]"), item);
                    }
                }
                ArrayFormat::Indices => {
                    for (index, item) in items.iter().enumerate() {
                        self.push(pairs, format!("{key}[{index}]"), item);
                    }
                }
                ArrayFormat::Comma => {
                    let joined: Vec<String> = items.iter().filter_map(scalar_text).collect();
                    if !joined.is_empty() {
                        pairs.push((key, joined.join(",")));
                    }
                }
            },
            Value::Object(map) => {
                for (sub, item) in map {
                    self.push(pairs, format!("{key}[{sub}]"), item);
                }
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

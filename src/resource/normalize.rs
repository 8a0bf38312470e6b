//! Defaults overlay for fetched records

use crate::types::JsonValue;

/// Lay `fetched` over `defaults`.
///
/// Top-level keys of `fetched` replace those of `defaults`, including keys
/// whose value is `null`. Keys missing from `fetched` keep their default.
/// Nested objects are replaced whole, not merged. A `null` response keeps the
/// defaults, and any other non-object response replaces them.
pub fn overlay(defaults: JsonValue, fetched: JsonValue) -> JsonValue {
    match (defaults, fetched) {
        (JsonValue::Object(mut merged), JsonValue::Object(fetched)) => {
            merged.extend(fetched);
            JsonValue::Object(merged)
        }
        (defaults, JsonValue::Null) => defaults,
        (_, fetched) => fetched,
    }
}

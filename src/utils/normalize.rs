//! Key normalization for page-state blobs
//!
//! Page-embedded state uses camelCase keys while the JSON API uses
//! snake_case. [`normalize_keys`] rewrites a whole tree so both retrieval
//! paths return the same shape.

use serde_json::{Map, Value};

/// Convert a camelCase key to snake_case.
///
/// An underscore is inserted before every ASCII uppercase letter and the key
/// is lowercased, so a leading capital yields a leading underscore.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Return a copy of `node` with every object key converted to snake_case.
///
/// Objects recurse; arrays recurse into elements that are objects and keep
/// every other element as is; scalars are returned unchanged.
pub fn normalize_keys(node: &Value) -> Value {
    match node {
        Value::Object(map) => Value::Object(normalize_object(map)),
        Value::Array(items) => Value::Array(items.iter().map(normalize_element).collect()),
        scalar => scalar.clone(),
    }
}

fn normalize_object(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (camel_to_snake(key), normalize_keys(value)))
        .collect()
}

fn normalize_element(item: &Value) -> Value {
    match item {
        Value::Object(map) => Value::Object(normalize_object(map)),
        other => other.clone(),
    }
}

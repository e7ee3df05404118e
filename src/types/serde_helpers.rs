//! Custom serde deserializers for flexible type handling
//!
//! Provides custom deserializers to handle the loose typing of sign services,
//! which may send timestamps either as JSON numbers or as strings.

use serde::{Deserialize, Deserializer, de};

/// Deserialize a flexible string value that can be:
/// - JSON string: `"1700000000000"`
/// - Integer: `1700000000000`
/// - Float with no fractional part: `1700000000000.0`
///
/// Booleans, arrays, objects and null are rejected.
pub fn deserialize_flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    // Use an intermediate Value type to handle multiple input types
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleString {
        String(String),
        Int(i64),
        Float(f64),
    }

    match FlexibleString::deserialize(deserializer)? {
        FlexibleString::String(s) => Ok(s),
        FlexibleString::Int(i) => Ok(i.to_string()),
        FlexibleString::Float(f) if f.fract() == 0.0 && f.is_finite() => {
            Ok(format!("{}", f as i64))
        }
        FlexibleString::Float(f) => Err(de::Error::custom(format!(
            "invalid timestamp number: {}",
            f
        ))),
    }
}

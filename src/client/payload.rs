//! Request URI and body encoding
//!
//! The signer always sees the final URI and the structured body; the wire body
//! is the escaped JSON string produced here.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use std::fmt::Write;

use crate::Result;

/// Bytes left bare in query keys and values: alphanumerics and `-_.!~*'()`.
/// A space becomes `%20`, never `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Append serialized query parameters to a URI.
///
/// The result is what gets signed and what gets sent.
pub fn with_query(uri: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return uri.to_string();
    }

    let query = params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_COMPONENT),
                utf8_percent_encode(v, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{}{}{}", uri, separator, query)
}

/// Serialize a body to JSON with every UTF-16 code unit from U+007F upward
/// written as a `\uXXXX` escape.
pub fn encode_body(body: &Value) -> Result<String> {
    let json = serde_json::to_string(body)?;
    Ok(escape_non_ascii(&json))
}

/// Escape every character at or above U+007F to `\uXXXX` (lowercase hex).
///
/// Characters outside the BMP become a surrogate pair of escapes.
pub fn escape_non_ascii(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut units = [0u16; 2];
    for ch in input.chars() {
        if (ch as u32) < 0x7F {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut units) {
                // Writing to a String cannot fail
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}

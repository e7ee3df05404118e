//! Response envelope definitions
//!
//! Every JSON API response is wrapped in an envelope carrying a success flag
//! and optional `code`, `data` and `msg` fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ResponseSnapshot;

/// Top-level JSON object wrapping every API response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Success flag
    #[serde(default)]
    pub success: bool,

    /// Platform error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,

    /// Response payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Platform message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ResponseEnvelope {
    /// Parse an envelope from a raw body, returning `None` for anything that
    /// is not a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    /// Payload returned on the success path.
    ///
    /// Falls back to the success flag itself when `data` is absent or null.
    pub fn success_payload(&self) -> Value {
        match &self.data {
            Some(data) if !data.is_null() => data.clone(),
            _ => Value::Bool(self.success),
        }
    }
}

/// Verification challenge details sent in response headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    /// Challenge type (`verifytype` header)
    #[serde(rename = "verifyType")]
    pub verify_type: String,

    /// Challenge id (`verifyuuid` header)
    #[serde(rename = "verifyUuid")]
    pub verify_uuid: String,
}

impl ChallengeInfo {
    /// Create new challenge info
    pub fn new(verify_type: impl Into<String>, verify_uuid: impl Into<String>) -> Self {
        Self {
            verify_type: verify_type.into(),
            verify_uuid: verify_uuid.into(),
        }
    }
}

/// Successful outcome of a pipeline call
#[derive(Debug, Clone)]
pub enum Payload {
    /// Classified success payload
    Data(Value),
    /// Response with an empty body, passed through unclassified
    Raw(ResponseSnapshot),
}

impl Payload {
    /// Flatten into a JSON value; raw pass-through responses become `null`
    pub fn into_value(self) -> Value {
        match self {
            Payload::Data(value) => value,
            Payload::Raw(_) => Value::Null,
        }
    }

    /// Borrow the classified data, if any
    pub fn data(&self) -> Option<&Value> {
        match self {
            Payload::Data(value) => Some(value),
            Payload::Raw(_) => None,
        }
    }
}

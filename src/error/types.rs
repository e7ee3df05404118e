//! Error type definitions
//!
//! Defines the main error types used throughout the client, including the
//! typed platform failures produced by the response classifier.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ChallengeInfo, ResponseEnvelope};

/// Platform error codes carried in the `code` field of a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The originating address is rate-limited or blocked
    IpBlock,
    /// The request signature was rejected
    SignFault,
}

impl ErrorCode {
    /// All known codes, in classification priority order
    pub const ALL: [ErrorCode; 2] = [ErrorCode::IpBlock, ErrorCode::SignFault];

    /// Numeric code as sent by the platform
    pub const fn code(self) -> i64 {
        match self {
            ErrorCode::IpBlock => 300012,
            ErrorCode::SignFault => 300015,
        }
    }

    /// Message shown by the platform for this code
    pub const fn message(self) -> &'static str {
        match self {
            ErrorCode::IpBlock => "网络连接异常，请检查网络设置或重启试试",
            ErrorCode::SignFault => "浏览器异常，请尝试关闭/卸载风险插件或重启试试！",
        }
    }

    /// Look up a known code
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// Snapshot of an HTTP response kept for diagnostics on failure
#[derive(Debug, Clone, Default)]
pub struct ResponseSnapshot {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: String,
}

impl ResponseSnapshot {
    /// Create a new snapshot
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Summary of a failure, suitable for printing as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Failure kind
    pub kind: String,
    /// Human readable message
    pub message: String,
    /// HTTP status, when the failure came from a response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    /// The platform demands an interactive verification challenge
    #[error(
        "Verification required: verify_type={}, verify_uuid={}",
        .challenge.verify_type,
        .challenge.verify_uuid
    )]
    NeedVerification {
        challenge: ChallengeInfo,
        response: Box<ResponseSnapshot>,
    },

    /// The originating address is blocked
    #[error("IP blocked: {}", ErrorCode::IpBlock.message())]
    IpBlocked { response: Box<ResponseSnapshot> },

    /// The request signature was rejected
    #[error("Signature rejected: {}", ErrorCode::SignFault.message())]
    SignatureRejected { response: Box<ResponseSnapshot> },

    /// Any other non-success response
    #[error(
        "Data fetch failed (HTTP {}): {}",
        .response.status,
        describe_envelope(.envelope.as_ref(), .response.body.as_str())
    )]
    DataFetchFailed {
        envelope: Option<ResponseEnvelope>,
        response: Box<ResponseSnapshot>,
    },

    /// DNS, connection, TLS or timeout failures
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Signer collaborator failures
    #[error("Signer error: {message}")]
    Signer { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A composed header value could not be encoded
    #[error("Invalid header value for {name}")]
    InvalidHeader { name: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

fn describe_envelope(envelope: Option<&ResponseEnvelope>, body: &str) -> String {
    match envelope {
        Some(env) => format!(
            "code={} msg={}",
            env.code.map(|c| c.to_string()).unwrap_or_else(|| "none".into()),
            env.msg.as_deref().unwrap_or("")
        ),
        None => {
            let mut preview: String = body.chars().take(200).collect();
            if preview.len() < body.len() {
                preview.push_str("...");
            }
            preview
        }
    }
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a signer error
    pub fn signer(message: impl Into<String>) -> Self {
        Self::Signer {
            message: message.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>) -> Self {
        Self::InvalidHeader { name: name.into() }
    }

    /// Whether this error was produced by response classification
    pub fn is_platform_failure(&self) -> bool {
        matches!(
            self,
            Self::NeedVerification { .. }
                | Self::IpBlocked { .. }
                | Self::SignatureRejected { .. }
                | Self::DataFetchFailed { .. }
        )
    }

    /// Response snapshot for classified failures
    pub fn response(&self) -> Option<&ResponseSnapshot> {
        match self {
            Self::NeedVerification { response, .. }
            | Self::IpBlocked { response }
            | Self::SignatureRejected { response }
            | Self::DataFetchFailed { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NeedVerification { .. } => "need_verification",
            Self::IpBlocked { .. } => "ip_blocked",
            Self::SignatureRejected { .. } => "signature_rejected",
            Self::DataFetchFailed { .. } => "data_fetch_failed",
            Self::Transport(_) => "transport",
            Self::Signer { .. } => "signer",
            Self::Config(_) => "config",
            Self::InvalidHeader { .. } => "invalid_header",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
        }
    }

    /// Build a serializable report
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind().to_string(),
            message: self.to_string(),
            status: self.response().map(|r| r.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test config error");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_platform_failure());
    }

    #[test]
    fn test_error_code_lookup() {
        assert_eq!(ErrorCode::from_code(300012), Some(ErrorCode::IpBlock));
        assert_eq!(ErrorCode::from_code(300015), Some(ErrorCode::SignFault));
        assert_eq!(ErrorCode::from_code(-100), None);
        assert_eq!(ErrorCode::IpBlock.code(), 300012);
    }

    #[test]
    fn test_need_verification_display() {
        let err = Error::NeedVerification {
            challenge: ChallengeInfo::new("v1", "u1"),
            response: Box::new(ResponseSnapshot::new(471, HeaderMap::new(), "")),
        };
        assert!(err.is_platform_failure());
        assert_eq!(err.response().map(|r| r.status), Some(471));
        assert!(err.to_string().contains("verify_type=v1"));
        assert!(err.to_string().contains("verify_uuid=u1"));
    }

    #[test]
    fn test_data_fetch_display_with_envelope() {
        let envelope = ResponseEnvelope {
            success: false,
            code: Some(-1),
            data: None,
            msg: Some("boom".to_string()),
        };
        let err = Error::DataFetchFailed {
            envelope: Some(envelope),
            response: Box::new(ResponseSnapshot::new(200, HeaderMap::new(), "{}")),
        };
        assert!(err.to_string().contains("code=-1 msg=boom"));
        assert_eq!(err.kind(), "data_fetch_failed");
    }

    #[test]
    fn test_data_fetch_display_truncates_body() {
        let err = Error::DataFetchFailed {
            envelope: None,
            response: Box::new(ResponseSnapshot::new(502, HeaderMap::new(), "x".repeat(500))),
        };
        let message = err.to_string();
        assert!(message.ends_with("..."));
        assert!(message.len() < 300);
    }

    #[test]
    fn test_signer_error() {
        let err = Error::signer("sign service unavailable");
        assert!(matches!(err, Error::Signer { .. }));
        assert!(err.response().is_none());

        let report = err.report();
        assert_eq!(report.kind, "signer");
        assert_eq!(report.status, None);
    }

    #[test]
    fn test_report_carries_status() {
        let err = Error::IpBlocked {
            response: Box::new(ResponseSnapshot::new(200, HeaderMap::new(), "{}")),
        };
        let report = err.report();
        assert_eq!(report.kind, "ip_blocked");
        assert_eq!(report.status, Some(200));
    }
}

//! Response classification
//!
//! Every response, 2xx or not, goes through [`classify`]. It is a pure
//! function of status, headers and body.

use reqwest::header::HeaderMap;

use crate::{
    Error, Result,
    error::{ErrorCode, ResponseSnapshot},
    types::{ChallengeInfo, Payload, ResponseEnvelope},
};

/// Statuses the platform uses to demand a verification challenge
pub const VERIFY_STATUS_CODES: [u16; 2] = [461, 471];

/// Header carrying the challenge type
pub const VERIFY_TYPE_HEADER: &str = "verifytype";
/// Header carrying the challenge id
pub const VERIFY_UUID_HEADER: &str = "verifyuuid";

/// Whether the status demands a verification challenge
pub fn is_verification_status(status: u16) -> bool {
    VERIFY_STATUS_CODES.contains(&status)
}

/// Classify a response into a payload or a typed failure.
///
/// Priority:
/// 1. verification status (461/471), whatever the body says
/// 2. empty body: passed through on 2xx, a fetch failure otherwise
/// 3. `success: true` envelope
/// 4. IP-block code
/// 5. signature-fault code
/// 6. anything else, including bodies that are not an envelope
pub fn classify(status: u16, headers: &HeaderMap, body: &str) -> Result<Payload> {
    let snapshot = || Box::new(ResponseSnapshot::new(status, headers.clone(), body));

    if is_verification_status(status) {
        let challenge = ChallengeInfo::new(
            header_text(headers, VERIFY_TYPE_HEADER),
            header_text(headers, VERIFY_UUID_HEADER),
        );
        tracing::warn!(
            "Verification required: verify_type={}, verify_uuid={}",
            challenge.verify_type,
            challenge.verify_uuid
        );
        return Err(Error::NeedVerification {
            challenge,
            response: snapshot(),
        });
    }

    if body.trim().is_empty() {
        let response = snapshot();
        if response.is_success() {
            return Ok(Payload::Raw(*response));
        }
        return Err(Error::DataFetchFailed {
            envelope: None,
            response,
        });
    }

    let Some(envelope) = ResponseEnvelope::parse(body) else {
        tracing::warn!("HTTP {} response is not a JSON envelope", status);
        return Err(Error::DataFetchFailed {
            envelope: None,
            response: snapshot(),
        });
    };

    if envelope.success {
        return Ok(Payload::Data(envelope.success_payload()));
    }

    match envelope.code.and_then(ErrorCode::from_code) {
        Some(ErrorCode::IpBlock) => {
            tracing::warn!("Request rejected: IP blocked");
            Err(Error::IpBlocked {
                response: snapshot(),
            })
        }
        Some(ErrorCode::SignFault) => {
            tracing::warn!("Request rejected: signature fault");
            Err(Error::SignatureRejected {
                response: snapshot(),
            })
        }
        None => {
            tracing::warn!(
                "Request failed: code={:?} msg={:?}",
                envelope.code,
                envelope.msg
            );
            Err(Error::DataFetchFailed {
                envelope: Some(envelope),
                response: snapshot(),
            })
        }
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

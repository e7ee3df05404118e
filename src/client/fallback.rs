//! Note retrieval from the public explore page
//!
//! The page embeds its initial store as `window.__INITIAL_STATE__=...`. The
//! blob is JavaScript rather than JSON (bare `undefined` values), uses
//! camelCase keys, and is only present when the request was not blocked.

use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use serde_json::Value;
use std::sync::LazyLock;

use crate::{
    Error, Result,
    error::{ErrorCode, ResponseSnapshot},
    utils::normalize::{camel_to_snake, normalize_keys},
};

use super::XhsClient;

static INITIAL_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.__INITIAL_STATE__=(\{.*\})</script>")
        .unwrap_or_else(|e| panic!("invalid initial state pattern: {e}"))
});

/// Pull the page state out of an explore page.
///
/// Returns `None` when the page carries no state, or an empty one.
pub fn extract_initial_state(html: &str) -> Result<Option<Value>> {
    let Some(captures) = INITIAL_STATE.captures(html) else {
        return Ok(None);
    };
    let state = captures[1].replace("undefined", "\"\"");
    if state == "{}" {
        return Ok(None);
    }
    let parsed: Value = serde_json::from_str(&state)?;
    Ok(Some(normalize_keys(&parsed)))
}

/// Find a note inside normalized page state
pub fn note_from_state<'a>(state: &'a Value, note_id: &str) -> Option<&'a Value> {
    let details = state.get("note")?.get("note_detail_map")?;
    details
        .get(note_id)
        .or_else(|| details.get(camel_to_snake(note_id)))?
        .get("note")
}

/// Turn a fetched explore page into a note or a classified failure
pub fn parse_note_page(
    status: u16,
    headers: HeaderMap,
    html: String,
    note_id: &str,
) -> Result<Value> {
    if let Some(state) = extract_initial_state(&html)? {
        if let Some(note) = note_from_state(&state, note_id) {
            return Ok(note.clone());
        }
        tracing::warn!("Page state for {} has no note entry", note_id);
    }

    let response = Box::new(ResponseSnapshot::new(status, headers, html));
    if response.body.contains(ErrorCode::IpBlock.message()) {
        return Err(Error::IpBlocked { response });
    }
    Err(Error::DataFetchFailed {
        envelope: None,
        response,
    })
}

impl XhsClient {
    /// Fetch a note by scraping its explore page instead of calling the API.
    ///
    /// No signature is involved; the session cookie is still sent.
    pub async fn get_note_by_id_from_html(&self, note_id: &str) -> Result<Value> {
        let home = self.settings().hosts.home.trim_end_matches('/');
        let url = format!("{}/explore/{}", home, note_id);

        let mut headers = HeaderMap::new();
        let referer = HeaderValue::from_str(&format!("{}/", home))
            .map_err(|_| Error::invalid_header("referer"))?;
        headers.insert(REFERER, referer);

        let (status, response_headers, html) = self.fetch_page(&url, headers).await?;
        parse_note_page(status, response_headers, html, note_id)
    }
}

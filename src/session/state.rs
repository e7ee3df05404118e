//! Session cookie state
//!
//! The raw cookie string is the single source of truth; identifier fields such
//! as `a1` are derived from it on every read.

use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Cookie state shared by every request of one client instance
#[derive(Debug, Default)]
pub struct SessionState {
    cookie: RwLock<Option<String>>,
}

impl SessionState {
    /// Create session state with an optional initial cookie
    pub fn new(cookie: Option<String>) -> Self {
        Self {
            cookie: RwLock::new(cookie),
        }
    }

    /// Replace the stored cookie.
    ///
    /// Waits for in-flight signing to finish, so a request never signs with
    /// one cookie and sends another.
    pub async fn set_cookie(&self, raw: impl Into<String>) {
        let raw = raw.into();
        let mut cookie = self.cookie.write().await;
        tracing::debug!(
            "Session cookie replaced ({} fields)",
            parse_cookie(&raw).len()
        );
        *cookie = Some(raw);
    }

    /// Last stored cookie, if any
    pub async fn cookie(&self) -> Option<String> {
        self.cookie.read().await.clone()
    }

    /// Named field of the stored cookie
    pub async fn cookie_field(&self, name: &str) -> Option<String> {
        let cookie = self.cookie.read().await;
        cookie
            .as_deref()
            .and_then(|raw| cookie_field(raw, name))
            .map(str::to_string)
    }

    /// Parsed view of the stored cookie
    pub async fn cookie_map(&self) -> HashMap<String, String> {
        let cookie = self.cookie.read().await;
        cookie.as_deref().map(parse_cookie).unwrap_or_default()
    }

    /// Hold the cookie for the duration of a signing pass
    pub async fn lock_for_signing(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.cookie.read().await
    }
}

/// Parse a `;`-delimited `key=value` cookie string.
///
/// Pairs without `=` or with an empty key are skipped; the first occurrence of
/// a key wins. Values are returned verbatim, never percent-decoded.
pub fn parse_cookie(raw: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            let key = key.trim();
            if !key.is_empty() {
                fields
                    .entry(key.to_string())
                    .or_insert_with(|| value.trim().to_string());
            }
        }
    }
    fields
}

/// Look up a single cookie field without building the whole map.
///
/// Like [`parse_cookie`], the value is not percent-decoded.
pub fn cookie_field<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOKIE: &str = "a1=18c0f7e3b2dabc; webId=5f2c; web_session=040069b3";

    #[test]
    fn test_cookie_values_not_decoded() {
        let raw = "a1=x%3Dy; gid=a%20b";
        assert_eq!(cookie_field(raw, "a1"), Some("x%3Dy"));
        assert_eq!(parse_cookie(raw).get("gid").map(String::as_str), Some("a%20b"));
    }

    #[test]
    fn test_parse_cookie() {
        let fields = parse_cookie(COOKIE);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("a1").map(String::as_str), Some("18c0f7e3b2dabc"));
        assert_eq!(fields.get("web_session").map(String::as_str), Some("040069b3"));
    }

    #[test]
    fn test_parse_malformed_cookie() {
        let fields = parse_cookie("garbage;;=novalue; a1=x=y ;flag");
        assert_eq!(fields.len(), 1);
        // Only the first '=' separates key from value
        assert_eq!(fields.get("a1").map(String::as_str), Some("x=y"));
    }

    #[test]
    fn test_cookie_field() {
        assert_eq!(cookie_field(COOKIE, "webId"), Some("5f2c"));
        assert_eq!(cookie_field(COOKIE, "missing"), None);
        assert_eq!(cookie_field("", "a1"), None);
        assert_eq!(cookie_field("a1", "a1"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let fields = parse_cookie("a1=first; a1=second");
        assert_eq!(fields.get("a1").map(String::as_str), Some("first"));
        assert_eq!(cookie_field("a1=first; a1=second", "a1"), Some("first"));
    }

    #[tokio::test]
    async fn test_empty_state() {
        let state = SessionState::default();
        assert_eq!(state.cookie().await, None);
        assert_eq!(state.cookie_field("a1").await, None);
        assert!(state.cookie_map().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_cookie_replaces_value() {
        let state = SessionState::new(Some("a1=old".to_string()));
        assert_eq!(state.cookie_field("a1").await.as_deref(), Some("old"));

        state.set_cookie("a1=new; web_session=s").await;
        assert_eq!(state.cookie().await.as_deref(), Some("a1=new; web_session=s"));
        assert_eq!(state.cookie_field("a1").await.as_deref(), Some("new"));
        assert_eq!(state.cookie_map().await.len(), 2);
    }

    #[tokio::test]
    async fn test_set_cookie_waits_for_signing() {
        use std::sync::Arc;
        use std::time::Duration;

        let state = Arc::new(SessionState::new(Some("a1=old".to_string())));
        let guard = state.lock_for_signing().await;

        let writer = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.set_cookie("a1=new").await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(guard.as_deref(), Some("a1=old"));
        assert!(!writer.is_finished());

        drop(guard);
        writer.await.unwrap();
        assert_eq!(state.cookie_field("a1").await.as_deref(), Some("new"));
    }
}

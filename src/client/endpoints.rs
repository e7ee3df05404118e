//! Web API endpoints
//!
//! Thin callers of the request pipeline; each only knows its path and payload.

use reqwest::Method;
use serde_json::{Value, json};

use crate::{
    Error, Result,
    types::{RequestOptions, ResponseEnvelope, SearchNoteType, SearchSortType},
    utils::search_id,
};

use super::{XhsClient, classify};

/// Note detail feed
pub const FEED_URI: &str = "/api/sns/web/v1/feed";
/// Current user profile
pub const SELF_INFO_URI: &str = "/api/sns/web/v1/user/selfinfo";
/// Current user profile, second revision
pub const SELF_INFO_V2_URI: &str = "/api/sns/web/v2/user/me";
/// Another user's profile
pub const USER_INFO_URI: &str = "/api/sns/web/v1/user/otherinfo";
/// Note search
pub const SEARCH_NOTES_URI: &str = "/api/sns/web/v1/search/notes";

/// Image formats requested with search results
const SEARCH_IMAGE_FORMATS: [&str; 3] = ["jpg", "webp", "avif"];

/// Parameters of a note search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search keyword
    pub keyword: String,
    /// 1-based page number
    pub page: u32,
    /// Results per page
    pub page_size: u32,
    /// Sort order
    pub sort: SearchSortType,
    /// Note kind filter
    pub note_type: SearchNoteType,
}

impl SearchQuery {
    /// First page of 20 results, default ranking, any note kind
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            page: 1,
            page_size: 20,
            sort: SearchSortType::default(),
            note_type: SearchNoteType::default(),
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn sort(mut self, sort: SearchSortType) -> Self {
        self.sort = sort;
        self
    }

    pub fn note_type(mut self, note_type: SearchNoteType) -> Self {
        self.note_type = note_type;
        self
    }

    /// Request body with a fresh search id
    pub fn to_body(&self) -> Value {
        json!({
            "keyword": self.keyword,
            "page": self.page,
            "page_size": self.page_size,
            "search_id": search_id(),
            "sort": self.sort.as_str(),
            "note_type": self.note_type.value(),
            "image_formats": SEARCH_IMAGE_FORMATS,
            "ext_flags": [],
        })
    }
}

impl XhsClient {
    /// Fetch a note's card through the detail feed.
    ///
    /// A successful feed without `items[0].note_card` is a fetch failure
    /// carrying the feed response as received.
    pub async fn get_note_by_id(&self, note_id: &str) -> Result<Value> {
        let mut options = RequestOptions::new();
        options.body = Some(json!({
            "source_note_id": note_id,
            "image_scenes": ["CRD_WM_WEBP"],
        }));
        let response = self.send(Method::POST, FEED_URI, options).await?;
        let data = classify(response.status, &response.headers, &response.body)?.into_value();

        match data.pointer("/items/0/note_card") {
            Some(card) => Ok(card.clone()),
            None => {
                tracing::warn!("Feed for note {} has no note card", note_id);
                Err(Error::DataFetchFailed {
                    envelope: ResponseEnvelope::parse(&response.body),
                    response: Box::new(response),
                })
            }
        }
    }

    /// Profile of the cookie's owner
    pub async fn get_self_info(&self) -> Result<Value> {
        self.get(SELF_INFO_URI, &[]).await
    }

    /// Profile of the cookie's owner, second revision
    pub async fn get_self_info_v2(&self) -> Result<Value> {
        self.get(SELF_INFO_V2_URI, &[]).await
    }

    /// Profile of another user
    pub async fn get_user_info(&self, user_id: &str) -> Result<Value> {
        self.get(USER_INFO_URI, &[("target_user_id", user_id)])
            .await
    }

    /// Search notes by keyword
    pub async fn get_note_by_keyword(
        &self,
        keyword: &str,
        page: u32,
        page_size: u32,
        sort: SearchSortType,
        note_type: SearchNoteType,
    ) -> Result<Value> {
        let query = SearchQuery::new(keyword)
            .page(page)
            .page_size(page_size)
            .sort(sort)
            .note_type(note_type);
        self.search_notes(&query).await
    }

    /// Search notes with a prepared query
    pub async fn search_notes(&self, query: &SearchQuery) -> Result<Value> {
        tracing::debug!(
            "Searching notes: keyword={:?} page={} sort={}",
            query.keyword,
            query.page,
            query.sort.as_str()
        );
        self.post(SEARCH_NOTES_URI, Some(query.to_body())).await
    }
}

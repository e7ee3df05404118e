//! Search option types

use serde::{Deserialize, Serialize};

/// Sort order for note search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSortType {
    /// Platform default ranking
    #[default]
    General,
    /// Most popular first
    PopularityDescending,
    /// Newest first
    TimeDescending,
}

impl SearchSortType {
    /// Wire value
    pub fn as_str(self) -> &'static str {
        match self {
            SearchSortType::General => "general",
            SearchSortType::PopularityDescending => "popularity_descending",
            SearchSortType::TimeDescending => "time_descending",
        }
    }
}

impl std::str::FromStr for SearchSortType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "general" => Ok(SearchSortType::General),
            "popularity_descending" | "popular" => Ok(SearchSortType::PopularityDescending),
            "time_descending" | "latest" => Ok(SearchSortType::TimeDescending),
            other => Err(crate::Error::config(format!("Unknown sort type: {}", other))),
        }
    }
}

/// Note kind filter for note search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchNoteType {
    /// Any note
    #[default]
    All,
    /// Video notes only
    Video,
    /// Image notes only
    Image,
}

impl SearchNoteType {
    /// Wire value
    pub fn value(self) -> u8 {
        match self {
            SearchNoteType::All => 0,
            SearchNoteType::Video => 1,
            SearchNoteType::Image => 2,
        }
    }
}

impl std::str::FromStr for SearchNoteType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "all" | "0" => Ok(SearchNoteType::All),
            "video" | "1" => Ok(SearchNoteType::Video),
            "image" | "2" => Ok(SearchNoteType::Image),
            other => Err(crate::Error::config(format!("Unknown note type: {}", other))),
        }
    }
}

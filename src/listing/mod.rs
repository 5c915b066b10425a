//! Listing model for Listing Watch
//!
//! This module provides the listing record, title normalization, year
//! extraction and criteria matching.

mod matcher;
mod normalize;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export main functions
pub use matcher::{find_match, SearchCriterion};
pub use normalize::{extract_year, normalize_title};

/// Text written to the store file in place of an absent field
pub const UNKNOWN: &str = "n/a";

/// One listing pulled from the listings page
///
/// Serialized with the store file's field names. Absent optional fields are
/// written as `"n/a"` and read back as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Site identifier of the listing, never empty
    #[serde(rename = "dataIid")]
    pub id: String,

    /// Raw display text of the title anchor
    #[serde(rename = "titleText", with = "sentinel", default)]
    pub title: Option<String>,

    /// Lowercase `[a-z0-9]` projection of the title, used only for matching
    #[serde(rename = "normalizedTitle", default)]
    pub normalized_title: String,

    /// Absolute link to the listing detail page
    #[serde(rename = "link", with = "sentinel", default)]
    pub url: Option<String>,

    /// First four-digit token of the title
    #[serde(with = "sentinel", default)]
    pub year: Option<String>,
}

impl ListingRecord {
    /// Builds a record, deriving the normalized title and the year
    pub fn new(id: impl Into<String>, title: Option<String>, url: Option<String>) -> Self {
        let normalized_title = title.as_deref().map(normalize_title).unwrap_or_default();
        let year = title.as_deref().and_then(extract_year);

        Self {
            id: id.into(),
            title,
            normalized_title,
            url,
            year,
        }
    }

    /// Year for display, `"n/a"` when unknown
    pub fn year_or_unknown(&self) -> &str {
        self.year.as_deref().unwrap_or(UNKNOWN)
    }

    /// Link for display, `"n/a"` when unknown
    pub fn url_or_unknown(&self) -> &str {
        self.url.as_deref().unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for ListingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.url_or_unknown())
    }
}

mod sentinel {
    use super::UNKNOWN;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(UNKNOWN))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|value| value != UNKNOWN))
    }
}

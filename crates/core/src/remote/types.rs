//! Types for remote catalog API responses.

use serde::{Deserialize, Serialize};

/// A full game record fetched from the upstream catalog.
///
/// Carries the complete upstream document (`raw`) plus the handful of fields
/// the cache denormalizes into queryable columns. Projections tolerate
/// missing upstream fields rather than failing the whole record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    /// Upstream catalog id.
    pub rawg_id: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Cover/backdrop image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Metacritic score (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<i64>,
    /// The full upstream JSON document.
    pub raw: serde_json::Value,
}

impl GameRecord {
    /// Build a record from a raw upstream document, projecting out the
    /// denormalized fields.
    pub fn from_payload(rawg_id: i64, raw: serde_json::Value) -> Self {
        let name = raw
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let slug = raw
            .get("slug")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let background_image = raw
            .get("background_image")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let metacritic = raw.get("metacritic").and_then(|v| v.as_i64());

        Self {
            rawg_id,
            name,
            slug,
            background_image,
            metacritic,
            raw,
        }
    }
}

/// A game as it appears in list/search results (no full document).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSummary {
    /// Upstream catalog id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    /// Cover/backdrop image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Metacritic score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<i64>,
    /// Community rating (0-5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// One page of browse/search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GamePage {
    /// Total matching games upstream.
    pub count: u64,
    /// Upstream URL of the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Upstream URL of the previous page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// Games on this page.
    pub results: Vec<GameSummary>,
}

impl GamePage {
    /// An empty page, used when the upstream is unavailable and the caller
    /// degrades instead of failing.
    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// A genre entry from the upstream catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_count: Option<u64>,
}

/// A platform entry from the upstream catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_count: Option<u64>,
}

/// Query for browsing/searching the upstream catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameQuery {
    /// Free-text search (omitted = plain browse).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Comma-separated genre ids or slugs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    /// Comma-separated platform ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<String>,
    /// Upstream ordering expression (e.g. "-rating", "-added").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Results per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for GameQuery {
    fn default() -> Self {
        Self {
            search: None,
            genres: None,
            platforms: None,
            ordering: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

//! Types for the game cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A cached game record.
///
/// `payload` is the full upstream document; `title`, `slug`,
/// `thumbnail_url` and `metacritic` are projections of it kept in their own
/// columns so lists can be rendered without touching the blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedGame {
    /// Internal row id (referenced by membership entries).
    pub id: i64,
    /// Upstream catalog id (unique).
    pub rawg_id: i64,
    /// Game title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Full upstream JSON document.
    pub payload: serde_json::Value,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Metacritic score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<i64>,
    /// When the payload was last fetched from upstream.
    pub last_refreshed: DateTime<Utc>,
}

/// Errors for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt cached payload: {0}")]
    CorruptPayload(String),
}

//! RAWG API client.
//!
//! RAWG requires an API key for access; the free tier allows 20k requests
//! per month, so responses worth keeping are cached by the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::types::{GamePage, GameQuery, GameRecord, GameSummary, GenreRecord, PlatformRecord};
use super::{GameSource, RemoteCatalogError};
use crate::config::RemoteCatalogConfig;

const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";

/// Page size used for the genre/platform filter lists.
const FILTER_PAGE_SIZE: u32 = 40;

/// RAWG API client.
pub struct RawgClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RawgClient {
    /// Create a new RAWG client.
    pub fn new(config: RemoteCatalogConfig) -> Result<Self, RemoteCatalogError> {
        if config.api_key.is_empty() {
            return Err(RemoteCatalogError::NotConfigured(
                "RAWG API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Map common upstream statuses to errors; `not_found` names the
    /// resource for 404 responses.
    async fn check_status(
        response: reqwest::Response,
        not_found: impl FnOnce() -> String,
    ) -> Result<reqwest::Response, RemoteCatalogError> {
        let status = response.status();
        if status == 401 {
            return Err(RemoteCatalogError::NotConfigured(
                "Invalid RAWG API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(RemoteCatalogError::NotFound(not_found()));
        }
        if status == 429 {
            return Err(RemoteCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl GameSource for RawgClient {
    async fn get_game(&self, id: i64) -> Result<GameRecord, RemoteCatalogError> {
        let url = format!("{}/games/{}", self.base_url, id);

        debug!("RAWG get game: id={}", id);

        let response = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await?;

        let response = Self::check_status(response, || format!("Game ID {}", id)).await?;

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            RemoteCatalogError::Parse(format!("Failed to parse game response: {}", e))
        })?;

        Ok(GameRecord::from_payload(id, payload))
    }

    async fn get_game_series(&self, id: i64) -> Result<Vec<GameSummary>, RemoteCatalogError> {
        let url = format!("{}/games/{}/game-series", self.base_url, id);

        debug!("RAWG get game series: id={}", id);

        let response = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await?;

        let response = Self::check_status(response, || format!("Game ID {}", id)).await?;

        let page: RawgPageResponse<RawgGameResult> = response.json().await.map_err(|e| {
            RemoteCatalogError::Parse(format!("Failed to parse game series response: {}", e))
        })?;

        Ok(page.results.into_iter().map(|r| r.into()).collect())
    }

    async fn browse_games(&self, query: &GameQuery) -> Result<GamePage, RemoteCatalogError> {
        let url = format!("{}/games", self.base_url);

        debug!(
            "RAWG browse: search={:?}, page={}, page_size={}",
            query.search, query.page, query.page_size
        );

        let mut request = self.client.get(&url).query(&[
            ("key", self.api_key.clone()),
            ("page", query.page.to_string()),
            ("page_size", query.page_size.to_string()),
        ]);

        if let Some(ref search) = query.search {
            request = request.query(&[("search", search)]);
        }
        if let Some(ref genres) = query.genres {
            request = request.query(&[("genres", genres)]);
        }
        if let Some(ref platforms) = query.platforms {
            request = request.query(&[("platforms", platforms)]);
        }
        if let Some(ref ordering) = query.ordering {
            request = request.query(&[("ordering", ordering)]);
        }

        let response = request.send().await?;
        let response = Self::check_status(response, || "games listing".to_string()).await?;

        let page: RawgPageResponse<RawgGameResult> = response.json().await.map_err(|e| {
            RemoteCatalogError::Parse(format!("Failed to parse games listing: {}", e))
        })?;

        Ok(page.into())
    }

    async fn list_genres(&self) -> Result<Vec<GenreRecord>, RemoteCatalogError> {
        let url = format!("{}/genres", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.clone()),
                ("page_size", FILTER_PAGE_SIZE.to_string()),
            ])
            .send()
            .await?;

        let response = Self::check_status(response, || "genres listing".to_string()).await?;

        let page: RawgPageResponse<GenreRecord> = response.json().await.map_err(|e| {
            RemoteCatalogError::Parse(format!("Failed to parse genres response: {}", e))
        })?;

        Ok(page.results)
    }

    async fn list_platforms(&self) -> Result<Vec<PlatformRecord>, RemoteCatalogError> {
        let url = format!("{}/platforms", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.clone()),
                ("page_size", FILTER_PAGE_SIZE.to_string()),
            ])
            .send()
            .await?;

        let response = Self::check_status(response, || "platforms listing".to_string()).await?;

        let page: RawgPageResponse<PlatformRecord> = response.json().await.map_err(|e| {
            RemoteCatalogError::Parse(format!("Failed to parse platforms response: {}", e))
        })?;

        Ok(page.results)
    }
}

// ============================================================================
// RAWG API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawgPageResponse<T> {
    #[serde(default)]
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawgGameResult {
    id: i64,
    name: String,
    #[serde(default)]
    slug: String,
    released: Option<String>,
    background_image: Option<String>,
    metacritic: Option<i64>,
    rating: Option<f64>,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<RawgGameResult> for GameSummary {
    fn from(r: RawgGameResult) -> Self {
        Self {
            id: r.id,
            name: r.name,
            slug: r.slug,
            released: r.released,
            background_image: r.background_image,
            metacritic: r.metacritic,
            rating: r.rating,
        }
    }
}

impl From<RawgPageResponse<RawgGameResult>> for GamePage {
    fn from(p: RawgPageResponse<RawgGameResult>) -> Self {
        Self {
            count: p.count,
            next: p.next,
            previous: p.previous,
            results: p.results.into_iter().map(|r| r.into()).collect(),
        }
    }
}

//! Remote game catalog integration (RAWG-compatible API).
//!
//! This module provides the client used to look up game records from the
//! upstream catalog service. Everything the rest of the system knows about
//! the upstream goes through the [`GameSource`] trait so tests can swap in
//! a mock.

mod rawg;
mod types;

pub use rawg::RawgClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
#[derive(Debug, Error)]
pub enum RemoteCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client not configured (missing or invalid API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for remote game catalog clients.
///
/// A failed call means "upstream unavailable", never "empty result" - callers
/// on read paths degrade to cached or absent data instead of propagating.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Fetch the full record for a single game by its upstream id.
    async fn get_game(&self, id: i64) -> Result<GameRecord, RemoteCatalogError>;

    /// Fetch games in the same series as the given game.
    async fn get_game_series(&self, id: i64) -> Result<Vec<GameSummary>, RemoteCatalogError>;

    /// Browse or search the catalog with optional filters.
    async fn browse_games(&self, query: &GameQuery) -> Result<GamePage, RemoteCatalogError>;

    /// List known genres (for filter dropdowns).
    async fn list_genres(&self) -> Result<Vec<GenreRecord>, RemoteCatalogError>;

    /// List known platforms (for filter dropdowns).
    async fn list_platforms(&self) -> Result<Vec<PlatformRecord>, RemoteCatalogError>;
}

//! Mock remote catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::remote::{
    GamePage, GameQuery, GameRecord, GameSource, GameSummary, GenreRecord, PlatformRecord,
    RemoteCatalogError,
};

/// A recorded remote query for test assertions.
#[derive(Debug, Clone)]
pub enum RecordedQuery {
    GetGame { id: i64 },
    GetGameSeries { id: i64 },
    BrowseGames { search: Option<String>, page: u32 },
    ListGenres,
    ListPlatforms,
}

/// Mock implementation of the [`GameSource`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable game records and listings
/// - Track queries for assertions (e.g. "no second fetch within the TTL")
/// - Simulate an unavailable upstream
#[derive(Debug, Default)]
pub struct MockGameSource {
    /// Game records by upstream id.
    games: Arc<RwLock<HashMap<i64, GameRecord>>>,
    /// Series results by upstream id.
    series: Arc<RwLock<HashMap<i64, Vec<GameSummary>>>>,
    /// Page returned by browse_games.
    browse_page: Arc<RwLock<Option<GamePage>>>,
    /// Genres returned by list_genres.
    genres: Arc<RwLock<Vec<GenreRecord>>>,
    /// Platforms returned by list_platforms.
    platforms: Arc<RwLock<Vec<PlatformRecord>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    /// If true, every operation fails as if the upstream were down.
    always_fail: Arc<RwLock<bool>>,
}

impl MockGameSource {
    /// Create a new empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a game record.
    pub async fn add_game(&self, record: GameRecord) {
        self.games.write().await.insert(record.rawg_id, record);
    }

    /// Set the series results for a game.
    pub async fn set_series(&self, id: i64, series: Vec<GameSummary>) {
        self.series.write().await.insert(id, series);
    }

    /// Set the page returned by browse_games.
    pub async fn set_browse_page(&self, page: GamePage) {
        *self.browse_page.write().await = Some(page);
    }

    /// Set the genre listing.
    pub async fn set_genres(&self, genres: Vec<GenreRecord>) {
        *self.genres.write().await = genres;
    }

    /// Set the platform listing.
    pub async fn set_platforms(&self, platforms: Vec<PlatformRecord>) {
        *self.platforms.write().await = platforms;
    }

    /// Make every subsequent operation fail (or stop failing).
    pub async fn set_always_fail(&self, fail: bool) {
        *self.always_fail.write().await = fail;
    }

    /// All recorded queries.
    pub async fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    /// Number of get_game calls made so far.
    pub async fn get_game_calls(&self) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| matches!(q, RecordedQuery::GetGame { .. }))
            .count()
    }

    async fn check_available(&self) -> Result<(), RemoteCatalogError> {
        if *self.always_fail.read().await {
            return Err(RemoteCatalogError::ApiError {
                status: 503,
                message: "mock upstream unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GameSource for MockGameSource {
    async fn get_game(&self, id: i64) -> Result<GameRecord, RemoteCatalogError> {
        self.queries
            .write()
            .await
            .push(RecordedQuery::GetGame { id });
        self.check_available().await?;

        self.games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RemoteCatalogError::NotFound(format!("Game ID {}", id)))
    }

    async fn get_game_series(&self, id: i64) -> Result<Vec<GameSummary>, RemoteCatalogError> {
        self.queries
            .write()
            .await
            .push(RecordedQuery::GetGameSeries { id });
        self.check_available().await?;

        Ok(self.series.read().await.get(&id).cloned().unwrap_or_default())
    }

    async fn browse_games(&self, query: &GameQuery) -> Result<GamePage, RemoteCatalogError> {
        self.queries.write().await.push(RecordedQuery::BrowseGames {
            search: query.search.clone(),
            page: query.page,
        });
        self.check_available().await?;

        Ok(self
            .browse_page
            .read()
            .await
            .clone()
            .unwrap_or_else(GamePage::empty))
    }

    async fn list_genres(&self) -> Result<Vec<GenreRecord>, RemoteCatalogError> {
        self.queries.write().await.push(RecordedQuery::ListGenres);
        self.check_available().await?;

        Ok(self.genres.read().await.clone())
    }

    async fn list_platforms(&self) -> Result<Vec<PlatformRecord>, RemoteCatalogError> {
        self.queries.write().await.push(RecordedQuery::ListPlatforms);
        self.check_available().await?;

        Ok(self.platforms.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_get_game_returns_configured_record() {
        let mock = MockGameSource::new();
        mock.add_game(fixtures::game_record(3498, "GTA V")).await;

        let record = mock.get_game(3498).await.unwrap();
        assert_eq!(record.name, "GTA V");
        assert_eq!(mock.get_game_calls().await, 1);
    }

    #[tokio::test]
    async fn test_get_game_unknown_is_not_found() {
        let mock = MockGameSource::new();
        let result = mock.get_game(1).await;
        assert!(matches!(result, Err(RemoteCatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_always_fail() {
        let mock = MockGameSource::new();
        mock.add_game(fixtures::game_record(3498, "GTA V")).await;
        mock.set_always_fail(true).await;

        let result = mock.get_game(3498).await;
        assert!(matches!(
            result,
            Err(RemoteCatalogError::ApiError { status: 503, .. })
        ));

        mock.set_always_fail(false).await;
        assert!(mock.get_game(3498).await.is_ok());
    }

    #[tokio::test]
    async fn test_browse_defaults_to_empty_page() {
        let mock = MockGameSource::new();
        let page = mock.browse_games(&GameQuery::default()).await.unwrap();
        assert!(page.results.is_empty());
    }
}

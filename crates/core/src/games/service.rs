//! Cache-or-refresh policy over the remote catalog.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::GameServiceError;
use crate::cache::{CachedGame, GameCacheStore};
use crate::collections::{CollectionStore, LibraryAddOutcome, ToggleOutcome};
use crate::metrics::{CACHE_LOOKUPS, REMOTE_FETCHES};
use crate::remote::GameSource;

/// Cached snapshots older than this are refreshed on next access.
pub const FRESHNESS_TTL_DAYS: i64 = 7;

/// Game lookup and membership service.
///
/// Owns no state of its own; storage and the remote client are injected so
/// tests can substitute in-memory stores and a mock upstream.
pub struct GameService {
    cache: Arc<dyn GameCacheStore>,
    remote: Arc<dyn GameSource>,
    collections: Arc<dyn CollectionStore>,
}

impl GameService {
    pub fn new(
        cache: Arc<dyn GameCacheStore>,
        remote: Arc<dyn GameSource>,
        collections: Arc<dyn CollectionStore>,
    ) -> Self {
        Self {
            cache,
            remote,
            collections,
        }
    }

    fn is_fresh(game: &CachedGame, now: DateTime<Utc>) -> bool {
        now - game.last_refreshed < Duration::days(FRESHNESS_TTL_DAYS)
    }

    /// Resolve a game by upstream id, serving the cache when fresh and
    /// refreshing it otherwise.
    ///
    /// - Fresh cached snapshot: returned unchanged, no remote call.
    /// - Miss or stale: the upstream record is fetched and the cached row
    ///   replaced wholesale with `last_refreshed = now`.
    /// - Upstream failure: the stale snapshot (if any) is served as
    ///   last-known-good; with nothing cached the game is simply absent.
    ///
    /// Storage failures always propagate; upstream failures never do.
    pub async fn get_or_refresh(
        &self,
        rawg_id: i64,
    ) -> Result<Option<CachedGame>, GameServiceError> {
        let now = Utc::now();
        let cached = self.cache.get(rawg_id)?;

        if let Some(ref game) = cached {
            if Self::is_fresh(game, now) {
                debug!("cache hit for game {}", rawg_id);
                CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                return Ok(cached);
            }
        }

        match self.remote.get_game(rawg_id).await {
            Ok(record) => {
                REMOTE_FETCHES.with_label_values(&["ok"]).inc();
                CACHE_LOOKUPS.with_label_values(&["refresh"]).inc();
                let stored = self.cache.upsert(&record, now)?;
                Ok(Some(stored))
            }
            Err(e) => {
                REMOTE_FETCHES.with_label_values(&["error"]).inc();
                match cached {
                    Some(stale) => {
                        warn!(
                            "upstream fetch failed for game {}, serving stale snapshot: {}",
                            rawg_id, e
                        );
                        CACHE_LOOKUPS.with_label_values(&["stale_fallback"]).inc();
                        Ok(Some(stale))
                    }
                    None => {
                        warn!("upstream fetch failed for uncached game {}: {}", rawg_id, e);
                        CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Flip wishlist membership for a game, caching it first if needed.
    pub async fn toggle_wishlist(
        &self,
        user_id: i64,
        rawg_id: i64,
    ) -> Result<ToggleOutcome, GameServiceError> {
        let game = self
            .get_or_refresh(rawg_id)
            .await?
            .ok_or(GameServiceError::GameNotFound(rawg_id))?;

        Ok(self.collections.toggle_wishlist(user_id, game.id)?)
    }

    /// Add a game to the user's library, caching it first if needed.
    pub async fn add_to_library(
        &self,
        user_id: i64,
        rawg_id: i64,
    ) -> Result<LibraryAddOutcome, GameServiceError> {
        let game = self
            .get_or_refresh(rawg_id)
            .await?
            .ok_or(GameServiceError::GameNotFound(rawg_id))?;

        Ok(self.collections.add_to_library(user_id, game.id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SqliteGameCache;
    use crate::collections::SqliteCollectionStore;
    use crate::remote::GameRecord;
    use crate::testing::{fixtures, MockGameSource};
    use crate::users::{NewUser, SqliteUserStore, UserStore};
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        service: GameService,
        cache: Arc<SqliteGameCache>,
        remote: Arc<MockGameSource>,
        user_id: i64,
    }

    fn setup() -> Fixture {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("test.db");

        let users = SqliteUserStore::new(&db_path).unwrap();
        let cache = Arc::new(SqliteGameCache::new(&db_path).unwrap());
        let collections = Arc::new(SqliteCollectionStore::new(&db_path).unwrap());
        let remote = Arc::new(MockGameSource::new());

        let user = users
            .create(NewUser {
                username: "neo".to_string(),
                email: "neo@matrix.io".to_string(),
                password_hash: "$argon2id$fake".to_string(),
            })
            .unwrap();

        let service = GameService::new(
            Arc::clone(&cache) as Arc<dyn GameCacheStore>,
            Arc::clone(&remote) as Arc<dyn GameSource>,
            Arc::clone(&collections) as Arc<dyn CollectionStore>,
        );

        Fixture {
            _dir: dir,
            service,
            cache,
            remote,
            user_id: user.id,
        }
    }

    #[tokio::test]
    async fn test_first_lookup_fetches_and_caches() {
        let f = setup();
        f.remote.add_game(fixtures::game_record(3498, "GTA V")).await;

        let game = f.service.get_or_refresh(3498).await.unwrap().unwrap();
        assert_eq!(game.rawg_id, 3498);
        assert_eq!(game.title, "GTA V");
        assert_eq!(f.remote.get_game_calls().await, 1);

        // The row landed in the cache.
        assert!(f.cache.get(3498).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_remote() {
        let f = setup();
        f.remote.add_game(fixtures::game_record(3498, "GTA V")).await;

        let first = f.service.get_or_refresh(3498).await.unwrap().unwrap();
        let second = f.service.get_or_refresh(3498).await.unwrap().unwrap();

        // One fetch total; identical data both times.
        assert_eq!(f.remote.get_game_calls().await, 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_refreshed_wholesale() {
        let f = setup();

        // Seed a snapshot dated past the TTL.
        let stale_time = Utc::now() - Duration::days(FRESHNESS_TTL_DAYS + 1);
        let old = GameRecord::from_payload(
            3498,
            json!({"id": 3498, "name": "Old Name", "slug": "old", "metacritic": 10}),
        );
        f.cache.upsert(&old, stale_time).unwrap();

        f.remote.add_game(fixtures::game_record(3498, "New Name")).await;

        let game = f.service.get_or_refresh(3498).await.unwrap().unwrap();

        assert_eq!(f.remote.get_game_calls().await, 1);
        assert_eq!(game.rawg_id, 3498);
        assert_eq!(game.title, "New Name");
        assert!(game.last_refreshed > stale_time);
        // Nothing from the old payload survived.
        assert_eq!(game.payload["name"], "New Name");
    }

    #[tokio::test]
    async fn test_snapshot_just_inside_ttl_is_served() {
        let f = setup();

        let almost_stale = Utc::now() - Duration::days(FRESHNESS_TTL_DAYS) + Duration::hours(1);
        let record = fixtures::game_record(3498, "GTA V");
        f.cache.upsert(&record, almost_stale).unwrap();

        let game = f.service.get_or_refresh(3498).await.unwrap().unwrap();
        assert_eq!(game.title, "GTA V");
        assert_eq!(f.remote.get_game_calls().await, 0);
    }

    #[tokio::test]
    async fn test_uncached_with_failing_remote_is_absent() {
        let f = setup();
        f.remote.set_always_fail(true).await;

        let result = f.service.get_or_refresh(3498).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_stale_snapshot_served_when_remote_fails() {
        let f = setup();

        let stale_time = Utc::now() - Duration::days(FRESHNESS_TTL_DAYS + 3);
        let record = fixtures::game_record(3498, "Last Known Good");
        f.cache.upsert(&record, stale_time).unwrap();

        f.remote.set_always_fail(true).await;

        let game = f.service.get_or_refresh(3498).await.unwrap().unwrap();
        assert_eq!(game.title, "Last Known Good");
        // The stale row was not touched.
        assert_eq!(
            f.cache.get(3498).unwrap().unwrap().last_refreshed,
            game.last_refreshed
        );
    }

    #[tokio::test]
    async fn test_toggle_wishlist_caches_game_first() {
        let f = setup();
        f.remote.add_game(fixtures::game_record(3498, "GTA V")).await;

        let outcome = f.service.toggle_wishlist(f.user_id, 3498).await.unwrap();
        assert!(outcome.added);
        assert!(f.cache.get(3498).unwrap().is_some());

        let outcome = f.service.toggle_wishlist(f.user_id, 3498).await.unwrap();
        assert!(!outcome.added);
    }

    #[tokio::test]
    async fn test_toggle_unresolvable_game_is_not_found() {
        let f = setup();
        f.remote.set_always_fail(true).await;

        let result = f.service.toggle_wishlist(f.user_id, 3498).await;
        assert!(matches!(result, Err(GameServiceError::GameNotFound(3498))));
    }

    #[tokio::test]
    async fn test_library_add_unresolvable_game_is_not_found() {
        let f = setup();
        f.remote.set_always_fail(true).await;

        let result = f.service.add_to_library(f.user_id, 3498).await;
        assert!(matches!(result, Err(GameServiceError::GameNotFound(3498))));
    }

    #[tokio::test]
    async fn test_library_add_twice_reports_already_present() {
        let f = setup();
        f.remote.add_game(fixtures::game_record(3498, "GTA V")).await;

        let first = f.service.add_to_library(f.user_id, 3498).await.unwrap();
        assert!(first.added);

        let second = f.service.add_to_library(f.user_id, 3498).await.unwrap();
        assert!(!second.added);
        assert!(second.reason.is_some());
    }
}

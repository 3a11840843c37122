//! Local cache of game records fetched from the remote catalog.
//!
//! The cache stores the full upstream document per game plus a few
//! denormalized columns used for listing without deserializing the blob.
//! Rows are never evicted; staleness is enforced at read time by the
//! freshness policy in [`crate::games`].

mod sqlite;
mod types;

pub use sqlite::SqliteGameCache;
pub use types::*;

use chrono::{DateTime, Utc};

use crate::remote::GameRecord;

/// Trait for game cache storage.
pub trait GameCacheStore: Send + Sync {
    /// Look up a cached game by its upstream id.
    fn get(&self, rawg_id: i64) -> Result<Option<CachedGame>, CacheError>;

    /// Insert or wholesale-replace the cached row for a game.
    ///
    /// Idempotent by `rawg_id`: calling twice replaces, never duplicates.
    /// Every mutable column is overwritten from the record and
    /// `last_refreshed` is set to `now`.
    fn upsert(&self, record: &GameRecord, now: DateTime<Utc>) -> Result<CachedGame, CacheError>;

    /// Number of cached games.
    fn count(&self) -> Result<u64, CacheError>;
}

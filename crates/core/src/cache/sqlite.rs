//! SQLite-backed game cache implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{CacheError, CachedGame, GameCacheStore};
use crate::remote::GameRecord;

/// SQLite-backed game cache.
pub struct SqliteGameCache {
    conn: Mutex<Connection>,
}

impl SqliteGameCache {
    /// Create a new SQLite game cache, creating the database file and tables
    /// if needed.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite game cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            -- Cached game records (one row per upstream id)
            CREATE TABLE IF NOT EXISTS game_cache (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rawg_id INTEGER NOT NULL UNIQUE,
                title TEXT NOT NULL,
                slug TEXT NOT NULL,
                payload TEXT NOT NULL,
                thumbnail_url TEXT,
                metacritic INTEGER,
                last_refreshed TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_game_cache_slug ON game_cache(slug);
            CREATE INDEX IF NOT EXISTS idx_game_cache_last_refreshed ON game_cache(last_refreshed);
            "#,
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }

    pub(crate) fn row_to_cached_game(row: &rusqlite::Row) -> rusqlite::Result<CachedGame> {
        let payload_str: String = row.get(4)?;
        let last_refreshed_str: String = row.get(7)?;

        // The payload column only ever holds a document that was serialized
        // by us; fall back to null rather than failing the whole row.
        let payload =
            serde_json::from_str(&payload_str).unwrap_or(serde_json::Value::Null);

        let last_refreshed = DateTime::parse_from_rfc3339(&last_refreshed_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(CachedGame {
            id: row.get(0)?,
            rawg_id: row.get(1)?,
            title: row.get(2)?,
            slug: row.get(3)?,
            payload,
            thumbnail_url: row.get(5)?,
            metacritic: row.get(6)?,
            last_refreshed,
        })
    }
}

const CACHED_GAME_COLUMNS: &str =
    "id, rawg_id, title, slug, payload, thumbnail_url, metacritic, last_refreshed";

impl GameCacheStore for SqliteGameCache {
    fn get(&self, rawg_id: i64) -> Result<Option<CachedGame>, CacheError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!("SELECT {} FROM game_cache WHERE rawg_id = ?", CACHED_GAME_COLUMNS),
            params![rawg_id],
            Self::row_to_cached_game,
        );

        match result {
            Ok(game) => Ok(Some(game)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CacheError::Database(e.to_string())),
        }
    }

    fn upsert(&self, record: &GameRecord, now: DateTime<Utc>) -> Result<CachedGame, CacheError> {
        let conn = self.conn.lock().unwrap();

        let payload = serde_json::to_string(&record.raw)
            .map_err(|e| CacheError::CorruptPayload(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO game_cache (rawg_id, title, slug, payload, thumbnail_url, metacritic, last_refreshed)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(rawg_id) DO UPDATE SET
                title = excluded.title,
                slug = excluded.slug,
                payload = excluded.payload,
                thumbnail_url = excluded.thumbnail_url,
                metacritic = excluded.metacritic,
                last_refreshed = excluded.last_refreshed
            "#,
            params![
                record.rawg_id,
                &record.name,
                &record.slug,
                &payload,
                &record.background_image,
                record.metacritic,
                &now.to_rfc3339(),
            ],
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        conn.query_row(
            &format!("SELECT {} FROM game_cache WHERE rawg_id = ?", CACHED_GAME_COLUMNS),
            params![record.rawg_id],
            Self::row_to_cached_game,
        )
        .map_err(|e| CacheError::Database(e.to_string()))
    }

    fn count(&self) -> Result<u64, CacheError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row("SELECT COUNT(*) FROM game_cache", [], |row| row.get(0))
            .map_err(|e| CacheError::Database(e.to_string()))
    }
}

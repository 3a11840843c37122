//! SQLite-backed collection store implementation.
//!
//! Opens its own connection on the shared database file; the `users` and
//! `game_cache` tables are created by their respective stores. Foreign keys
//! are switched on so membership rows cannot outlive or precede the rows
//! they reference.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::{CollectionError, CollectionStore, LibraryAddOutcome, Membership, ToggleOutcome};
use crate::cache::{CachedGame, SqliteGameCache};

/// SQLite-backed wishlist/library store.
pub struct SqliteCollectionStore {
    conn: Mutex<Connection>,
}

impl SqliteCollectionStore {
    /// Create a new SQLite collection store, creating the database file and
    /// tables if needed.
    pub fn new(path: &Path) -> Result<Self, CollectionError> {
        let conn = Connection::open(path).map_err(|e| CollectionError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CollectionError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS wishlist_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                game_id INTEGER NOT NULL REFERENCES game_cache(id),
                added_on TEXT NOT NULL,
                UNIQUE(user_id, game_id)
            );

            CREATE INDEX IF NOT EXISTS idx_wishlist_entries_user ON wishlist_entries(user_id);

            CREATE TABLE IF NOT EXISTS library_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                game_id INTEGER NOT NULL REFERENCES game_cache(id),
                added_on TEXT NOT NULL,
                UNIQUE(user_id, game_id)
            );

            CREATE INDEX IF NOT EXISTS idx_library_entries_user ON library_entries(user_id);
            "#,
        )
        .map_err(|e| CollectionError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_joined(&self, table: &str, user_id: i64) -> Result<Vec<CachedGame>, CollectionError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT gc.id, gc.rawg_id, gc.title, gc.slug, gc.payload,
                        gc.thumbnail_url, gc.metacritic, gc.last_refreshed
                 FROM {table} e
                 JOIN game_cache gc ON gc.id = e.game_id
                 WHERE e.user_id = ?
                 ORDER BY e.added_on DESC, e.id DESC"
            ))
            .map_err(|e| CollectionError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id], SqliteGameCache::row_to_cached_game)
            .map_err(|e| CollectionError::Database(e.to_string()))?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row.map_err(|e| CollectionError::Database(e.to_string()))?);
        }
        Ok(games)
    }

    fn count_entries(&self, table: &str, user_id: i64) -> Result<u64, CollectionError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE user_id = ?"),
            params![user_id],
            |row| row.get(0),
        )
        .map_err(|e| CollectionError::Database(e.to_string()))
    }
}

impl CollectionStore for SqliteCollectionStore {
    fn toggle_wishlist(&self, user_id: i64, game_id: i64) -> Result<ToggleOutcome, CollectionError> {
        let conn = self.conn.lock().unwrap();

        let removed = conn
            .execute(
                "DELETE FROM wishlist_entries WHERE user_id = ? AND game_id = ?",
                params![user_id, game_id],
            )
            .map_err(|e| CollectionError::Database(e.to_string()))?;

        if removed > 0 {
            return Ok(ToggleOutcome { added: false });
        }

        // OR IGNORE collapses a raced duplicate insert into a no-op; either
        // way the pair is now present.
        conn.execute(
            "INSERT OR IGNORE INTO wishlist_entries (user_id, game_id, added_on) VALUES (?, ?, ?)",
            params![user_id, game_id, &Utc::now().to_rfc3339()],
        )
        .map_err(|e| CollectionError::Database(e.to_string()))?;

        Ok(ToggleOutcome { added: true })
    }

    fn add_to_library(
        &self,
        user_id: i64,
        game_id: i64,
    ) -> Result<LibraryAddOutcome, CollectionError> {
        let conn = self.conn.lock().unwrap();

        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO library_entries (user_id, game_id, added_on) VALUES (?, ?, ?)",
                params![user_id, game_id, &Utc::now().to_rfc3339()],
            )
            .map_err(|e| CollectionError::Database(e.to_string()))?;

        if inserted == 0 {
            Ok(LibraryAddOutcome::already_present())
        } else {
            Ok(LibraryAddOutcome::added())
        }
    }

    fn list_wishlist(&self, user_id: i64) -> Result<Vec<CachedGame>, CollectionError> {
        self.list_joined("wishlist_entries", user_id)
    }

    fn list_library(&self, user_id: i64) -> Result<Vec<CachedGame>, CollectionError> {
        self.list_joined("library_entries", user_id)
    }

    fn wishlist_count(&self, user_id: i64) -> Result<u64, CollectionError> {
        self.count_entries("wishlist_entries", user_id)
    }

    fn library_count(&self, user_id: i64) -> Result<u64, CollectionError> {
        self.count_entries("library_entries", user_id)
    }

    fn membership(&self, user_id: i64, game_id: i64) -> Result<Membership, CollectionError> {
        let conn = self.conn.lock().unwrap();

        let in_wishlist: bool = conn
            .query_row(
                "SELECT 1 FROM wishlist_entries WHERE user_id = ? AND game_id = ?",
                params![user_id, game_id],
                |_| Ok(true),
            )
            .unwrap_or(false);

        let in_library: bool = conn
            .query_row(
                "SELECT 1 FROM library_entries WHERE user_id = ? AND game_id = ?",
                params![user_id, game_id],
                |_| Ok(true),
            )
            .unwrap_or(false);

        Ok(Membership {
            in_wishlist,
            in_library,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::GameCacheStore;
    use crate::remote::GameRecord;
    use crate::users::{NewUser, SqliteUserStore, UserStore};
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        collections: SqliteCollectionStore,
        user_id: i64,
        game_id: i64,
        other_game_id: i64,
    }

    fn setup() -> Fixture {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("test.db");

        let users = SqliteUserStore::new(&db_path).unwrap();
        let cache = SqliteGameCache::new(&db_path).unwrap();
        let collections = SqliteCollectionStore::new(&db_path).unwrap();

        let user = users
            .create(NewUser {
                username: "neo".to_string(),
                email: "neo@matrix.io".to_string(),
                password_hash: "$argon2id$fake".to_string(),
            })
            .unwrap();

        let game = cache
            .upsert(
                &GameRecord::from_payload(3498, json!({"id": 3498, "name": "GTA V", "slug": "gta-v"})),
                Utc::now(),
            )
            .unwrap();
        let other = cache
            .upsert(
                &GameRecord::from_payload(802, json!({"id": 802, "name": "Borderlands", "slug": "borderlands"})),
                Utc::now(),
            )
            .unwrap();

        Fixture {
            _dir: dir,
            collections,
            user_id: user.id,
            game_id: game.id,
            other_game_id: other.id,
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let f = setup();

        let first = f.collections.toggle_wishlist(f.user_id, f.game_id).unwrap();
        assert!(first.added);
        assert_eq!(f.collections.wishlist_count(f.user_id).unwrap(), 1);

        let second = f.collections.toggle_wishlist(f.user_id, f.game_id).unwrap();
        assert!(!second.added);
        assert_eq!(f.collections.wishlist_count(f.user_id).unwrap(), 0);
    }

    #[test]
    fn test_toggle_twice_restores_original_state() {
        let f = setup();

        let before = f.collections.membership(f.user_id, f.game_id).unwrap();
        f.collections.toggle_wishlist(f.user_id, f.game_id).unwrap();
        f.collections.toggle_wishlist(f.user_id, f.game_id).unwrap();
        let after = f.collections.membership(f.user_id, f.game_id).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_library_add_only_no_duplicate() {
        let f = setup();

        let first = f.collections.add_to_library(f.user_id, f.game_id).unwrap();
        assert!(first.added);
        assert!(first.reason.is_none());

        let second = f.collections.add_to_library(f.user_id, f.game_id).unwrap();
        assert!(!second.added);
        assert_eq!(second.reason.as_deref(), Some("already in library"));

        assert_eq!(f.collections.library_count(f.user_id).unwrap(), 1);
    }

    #[test]
    fn test_wishlist_and_library_are_independent() {
        let f = setup();

        f.collections.toggle_wishlist(f.user_id, f.game_id).unwrap();
        f.collections.add_to_library(f.user_id, f.other_game_id).unwrap();

        let m = f.collections.membership(f.user_id, f.game_id).unwrap();
        assert!(m.in_wishlist);
        assert!(!m.in_library);

        let m = f.collections.membership(f.user_id, f.other_game_id).unwrap();
        assert!(!m.in_wishlist);
        assert!(m.in_library);
    }

    #[test]
    fn test_list_wishlist_joins_cached_games() {
        let f = setup();

        f.collections.toggle_wishlist(f.user_id, f.game_id).unwrap();
        f.collections.toggle_wishlist(f.user_id, f.other_game_id).unwrap();

        let games = f.collections.list_wishlist(f.user_id).unwrap();
        assert_eq!(games.len(), 2);
        // Most recently added first.
        assert_eq!(games[0].rawg_id, 802);
        assert_eq!(games[1].rawg_id, 3498);
        assert_eq!(games[1].title, "GTA V");
    }

    #[test]
    fn test_list_library_empty() {
        let f = setup();
        assert!(f.collections.list_library(f.user_id).unwrap().is_empty());
    }

    #[test]
    fn test_orphan_membership_rejected() {
        let f = setup();

        // No cached game with internal id 9999 - the foreign key must refuse.
        let result = f.collections.toggle_wishlist(f.user_id, 9999);
        assert!(matches!(result, Err(CollectionError::Database(_))));

        let result = f.collections.add_to_library(f.user_id, 9999);
        assert!(matches!(result, Err(CollectionError::Database(_))));
    }

    #[test]
    fn test_counts_are_per_user() {
        let f = setup();

        f.collections.toggle_wishlist(f.user_id, f.game_id).unwrap();

        assert_eq!(f.collections.wishlist_count(f.user_id).unwrap(), 1);
        assert_eq!(f.collections.wishlist_count(f.user_id + 1).unwrap(), 0);
    }
}

//! Per-user game collections: wishlist and library.
//!
//! Two independent many-to-many relations between users and cached games,
//! with different mutation semantics: the wishlist is a toggle (a repeat
//! call removes the entry), the library is add-only. The asymmetry mirrors
//! the product behavior; there is intentionally no library-remove operation.
//!
//! Rows reference cached games by their internal id, so every membership
//! write must be preceded by a cache upsert (see [`crate::games`]).

mod sqlite;
mod types;

pub use sqlite::SqliteCollectionStore;
pub use types::*;

use thiserror::Error;

use crate::cache::CachedGame;

/// Errors for collection operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Trait for wishlist/library storage.
pub trait CollectionStore: Send + Sync {
    /// Flip wishlist membership for (user, game).
    ///
    /// Removes the entry if present (reports `added: false`), inserts it
    /// otherwise (reports `added: true`). The uniqueness constraint is
    /// enforced at the storage layer, so a raced duplicate insert collapses
    /// to a no-op instead of a second row.
    fn toggle_wishlist(&self, user_id: i64, game_id: i64) -> Result<ToggleOutcome, CollectionError>;

    /// Add a game to the user's library.
    ///
    /// Add-only: a repeat call reports `added: false` with a reason and
    /// leaves the single existing row untouched.
    fn add_to_library(
        &self,
        user_id: i64,
        game_id: i64,
    ) -> Result<LibraryAddOutcome, CollectionError>;

    /// Games on the user's wishlist, most recently added first.
    fn list_wishlist(&self, user_id: i64) -> Result<Vec<CachedGame>, CollectionError>;

    /// Games in the user's library, most recently added first.
    fn list_library(&self, user_id: i64) -> Result<Vec<CachedGame>, CollectionError>;

    /// Number of wishlist entries for the user.
    fn wishlist_count(&self, user_id: i64) -> Result<u64, CollectionError>;

    /// Number of library entries for the user.
    fn library_count(&self, user_id: i64) -> Result<u64, CollectionError>;

    /// Membership flags for (user, game).
    fn membership(&self, user_id: i64, game_id: i64) -> Result<Membership, CollectionError>;
}

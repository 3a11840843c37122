//! Game lookup service: the cache-or-refresh policy.
//!
//! Every path that needs a game record - direct lookup, wishlist toggle,
//! library add - funnels through [`GameService::get_or_refresh`], which is
//! what guarantees a membership entry can never reference a game that was
//! not first cached.

mod service;

pub use service::{GameService, FRESHNESS_TTL_DAYS};

use thiserror::Error;

use crate::cache::CacheError;
use crate::collections::CollectionError;

/// Errors for game service operations.
#[derive(Debug, Error)]
pub enum GameServiceError {
    /// The game could not be resolved: not cached and the upstream fetch
    /// failed. Surfaced to the boundary as a user-facing "not found".
    #[error("Game not found: {0}")]
    GameNotFound(i64),

    /// Cache storage failure. Never degraded.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Collection storage failure. Never degraded.
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

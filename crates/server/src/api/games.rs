//! Game lookup and catalog-proxy handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use playshelf_core::{GamePage, GameQuery, GameSummary, GenreRecord, Membership, PlatformRecord};

use super::{internal_error, middleware, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GameDetailResponse {
    pub rawg_id: i64,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<i64>,
    /// When the cached snapshot was last fetched from upstream.
    pub last_refreshed: DateTime<Utc>,
    /// The full upstream document.
    pub game: serde_json::Value,
    /// Other games in the same series (best-effort).
    pub related: Vec<GameSummary>,
    pub in_wishlist: bool,
    pub in_library: bool,
}

#[derive(Debug, Serialize)]
pub struct GenreListResponse {
    pub results: Vec<GenreRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct PlatformListResponse {
    pub results: Vec<PlatformRecord>,
    pub total: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/games/{id}
///
/// Resolve a game through the cache-or-refresh policy. Membership flags are
/// filled in when the request carries a valid session token.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<GameDetailResponse>, (StatusCode, Json<ErrorResponse>)> {
    let game = state
        .games()
        .get_or_refresh(id)
        .await
        .map_err(internal_error)?;

    let Some(game) = game else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Game not found: {}", id))),
        ));
    };

    // Related games are decoration; an upstream hiccup must not take the
    // detail page down with it.
    let related = match state.remote().get_game_series(id).await {
        Ok(series) => series,
        Err(e) => {
            warn!("failed to fetch game series for {}: {}", id, e);
            Vec::new()
        }
    };

    let membership = match middleware::optional_user(&state, &headers) {
        Some(user_id) => state
            .collections()
            .membership(user_id, game.id)
            .map_err(internal_error)?,
        None => Membership::default(),
    };

    Ok(Json(GameDetailResponse {
        rawg_id: game.rawg_id,
        title: game.title,
        slug: game.slug,
        thumbnail_url: game.thumbnail_url,
        metacritic: game.metacritic,
        last_refreshed: game.last_refreshed,
        game: game.payload,
        related,
        in_wishlist: membership.in_wishlist,
        in_library: membership.in_library,
    }))
}

/// GET /api/v1/games
///
/// Uncached proxy of the upstream browse/search. Upstream failure degrades
/// to an empty page rather than an error.
pub async fn browse_games(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
) -> Json<GamePage> {
    match state.remote().browse_games(&query).await {
        Ok(page) => Json(page),
        Err(e) => {
            warn!("upstream browse failed: {}", e);
            Json(GamePage::empty())
        }
    }
}

/// GET /api/v1/genres
pub async fn list_genres(State(state): State<Arc<AppState>>) -> Json<GenreListResponse> {
    let results = match state.remote().list_genres().await {
        Ok(genres) => genres,
        Err(e) => {
            warn!("upstream genre listing failed: {}", e);
            Vec::new()
        }
    };
    let total = results.len();
    Json(GenreListResponse { results, total })
}

/// GET /api/v1/platforms
pub async fn list_platforms(State(state): State<Arc<AppState>>) -> Json<PlatformListResponse> {
    let results = match state.remote().list_platforms().await {
        Ok(platforms) => platforms,
        Err(e) => {
            warn!("upstream platform listing failed: {}", e);
            Vec::new()
        }
    };
    let total = results.len();
    Json(PlatformListResponse { results, total })
}

//! Wishlist and library handlers.
//!
//! The wishlist toggles; the library is add-only. Both funnel the game
//! through the cache-or-refresh policy before writing membership, so an
//! unresolvable id is a 404, never an orphan row.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use playshelf_core::{CachedGame, GameServiceError, LibraryAddOutcome, ToggleOutcome};

use super::{internal_error, middleware::CurrentUser, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GameIdRequest {
    pub game_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CollectionListResponse {
    pub games: Vec<CachedGame>,
    pub total: usize,
}

fn map_service_error(e: GameServiceError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        GameServiceError::GameNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Game not found: {}", id))),
        ),
        other => internal_error(other),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/wishlist/toggle
pub async fn toggle_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(request): Json<GameIdRequest>,
) -> Result<Json<ToggleOutcome>, (StatusCode, Json<ErrorResponse>)> {
    state
        .games()
        .toggle_wishlist(user_id, request.game_id)
        .await
        .map(Json)
        .map_err(map_service_error)
}

/// POST /api/v1/library/add
pub async fn add_to_library(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(request): Json<GameIdRequest>,
) -> Result<Json<LibraryAddOutcome>, (StatusCode, Json<ErrorResponse>)> {
    state
        .games()
        .add_to_library(user_id, request.game_id)
        .await
        .map(Json)
        .map_err(map_service_error)
}

/// GET /api/v1/wishlist
pub async fn list_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<CollectionListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let games = state
        .collections()
        .list_wishlist(user_id)
        .map_err(internal_error)?;
    let total = games.len();
    Ok(Json(CollectionListResponse { games, total }))
}

/// GET /api/v1/library
pub async fn list_library(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<CollectionListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let games = state
        .collections()
        .list_library(user_id)
        .map_err(internal_error)?;
    let total = games.len();
    Ok(Json(CollectionListResponse { games, total }))
}

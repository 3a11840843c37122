//! Registration, login, logout and profile handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use playshelf_core::users::password;
use playshelf_core::{NewUser, User, UserError};

use super::{
    internal_error,
    middleware::{CurrentUser, SessionToken},
    ErrorResponse,
};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub wishlist_count: u64,
    pub library_count: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), (StatusCode, Json<ErrorResponse>)> {
    if request.username.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "username, email and password are required",
            )),
        ));
    }

    let password_hash = password::hash_password(&request.password).map_err(internal_error)?;

    let user = state
        .users()
        .create(NewUser {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_string(),
            password_hash,
        })
        .map_err(|e| match e {
            UserError::DuplicateUsername(_) | UserError::DuplicateEmail(_) => {
                (StatusCode::CONFLICT, Json(ErrorResponse::new(e.to_string())))
            }
            other => internal_error(other),
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Same response whether the email is unknown or the password is wrong.
    let invalid = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid email or password")),
        )
    };

    let user = state
        .users()
        .find_by_email(request.email.trim())
        .map_err(internal_error)?
        .ok_or_else(invalid)?;

    let verified =
        password::verify_password(&request.password, &user.password_hash).map_err(internal_error)?;
    if !verified {
        return Err(invalid());
    }

    let token = state.sessions().create(user.id);

    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Json<MessageResponse> {
    state.sessions().revoke(&token);
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

/// GET /api/v1/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Users are never deleted, so a session pointing at a missing user
    // means the token is bogus.
    let user = state
        .users()
        .get(user_id)
        .map_err(internal_error)?
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Session expired or invalid")),
            )
        })?;

    let wishlist_count = state
        .collections()
        .wishlist_count(user_id)
        .map_err(internal_error)?;
    let library_count = state
        .collections()
        .library_count(user_id)
        .map_err(internal_error)?;

    Ok(Json(ProfileResponse {
        user,
        wishlist_count,
        library_count,
    }))
}

pub mod auth;
pub mod collections;
pub mod games;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Map a storage or hashing failure to a generic 500.
pub(crate) fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(e.to_string())),
    )
}

//! Authentication and metrics middleware for API routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use super::ErrorResponse;
use crate::metrics::{
    normalize_path, AUTH_FAILURES_TOTAL, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL,
    HTTP_REQUEST_DURATION,
};
use crate::state::AppState;

/// Authenticated user id, inserted into request extensions by
/// [`auth_middleware`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

/// The bearer token the session was resolved from (needed by logout).
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Extract a bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|s| s.to_string())
}

/// Resolve the current user from headers without requiring authentication.
/// Used by endpoints that personalize their response when a session is
/// present but work fine anonymously.
pub fn optional_user(state: &AppState, headers: &HeaderMap) -> Option<i64> {
    bearer_token(headers).and_then(|token| state.sessions().resolve(&token))
}

/// Metrics middleware that tracks HTTP request duration and counts.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Authentication middleware for session-gated routes.
///
/// Resolves the bearer token against the session store and inserts
/// [`CurrentUser`] and [`SessionToken`] into request extensions. Requests
/// without a valid session get a 401 with a JSON error body.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let token = match bearer_token(request.headers()) {
        Some(token) => token,
        None => {
            AUTH_FAILURES_TOTAL
                .with_label_values(&["missing_token"])
                .inc();
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Please log in first")),
            ));
        }
    };

    match state.sessions().resolve(&token) {
        Some(user_id) => {
            request.extensions_mut().insert(CurrentUser(user_id));
            request.extensions_mut().insert(SessionToken(token));
            Ok(next.run(request).await)
        }
        None => {
            AUTH_FAILURES_TOTAL
                .with_label_values(&["invalid_token"])
                .inc();
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Session expired or invalid")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_lowercase() {
        let headers = headers_with_auth("bearer abc123");
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_missing() {
        assert!(bearer_token(&HeaderMap::new()).is_none());

        let headers = headers_with_auth("Basic abc123");
        assert!(bearer_token(&headers).is_none());
    }
}

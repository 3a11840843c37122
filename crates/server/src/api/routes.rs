use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{auth, collections, games, handlers, middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes that work without a session (game detail personalizes itself
    // when a token happens to be present).
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/games", get(games::browse_games))
        .route("/games/{id}", get(games::get_game))
        .route("/genres", get(games::list_genres))
        .route("/platforms", get(games::list_platforms));

    // Session-gated routes.
    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/profile", get(auth::profile))
        .route("/wishlist", get(collections::list_wishlist))
        .route("/wishlist/toggle", post(collections::toggle_wishlist))
        .route("/library", get(collections::list_library))
        .route("/library/add", post(collections::add_to_library))
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes).with_state(state);

    Router::new()
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

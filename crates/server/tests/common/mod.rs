//! Common test utilities for integration testing with mocks.
//!
//! Builds the full router in-process with real SQLite stores on a temp file
//! and a mock remote catalog, so tests exercise everything but the network.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use playshelf_core::testing::MockGameSource;
use playshelf_core::{
    CollectionStore, Config, DatabaseConfig, GameCacheStore, GameService, GameSource,
    RemoteCatalogConfig, ServerConfig, SqliteCollectionStore, SqliteGameCache, SqliteUserStore,
    UserStore,
};
use playshelf_server::api::create_router;
use playshelf_server::state::AppState;

/// Re-export fixtures for test convenience
pub use playshelf_core::testing::fixtures;

/// Test fixture with an in-process server and a controllable mock upstream.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock remote catalog - configure game records and failures
    pub remote: Arc<MockGameSource>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty database and mock upstream.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let remote = Arc::new(MockGameSource::new());

        let config = Config {
            remote: RemoteCatalogConfig {
                api_key: "test-key".to_string(),
                base_url: None,
                timeout_secs: 30,
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
        };

        let users: Arc<dyn UserStore> = Arc::new(
            SqliteUserStore::new(&db_path).expect("Failed to create user store"),
        );
        let cache: Arc<dyn GameCacheStore> = Arc::new(
            SqliteGameCache::new(&db_path).expect("Failed to create game cache"),
        );
        let collections: Arc<dyn CollectionStore> = Arc::new(
            SqliteCollectionStore::new(&db_path).expect("Failed to create collection store"),
        );

        let games = GameService::new(
            Arc::clone(&cache),
            Arc::clone(&remote) as Arc<dyn GameSource>,
            Arc::clone(&collections),
        );

        let state = Arc::new(AppState::new(
            config,
            games,
            Arc::clone(&remote) as Arc<dyn GameSource>,
            users,
            collections,
        ));

        let router = create_router(state);

        Self {
            router,
            remote,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    /// Send a GET request with a bearer token.
    pub async fn get_auth(&self, path: &str, token: &str) -> TestResponse {
        self.request("GET", path, None, Some(token)).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), None).await
    }

    /// Send a POST request with JSON body and a bearer token.
    pub async fn post_auth(&self, path: &str, body: Value, token: &str) -> TestResponse {
        self.request("POST", path, Some(body), Some(token)).await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Register a user and log them in, returning the session token.
    pub async fn register_and_login(&self, username: &str, email: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/v1/auth/register",
                json!({
                    "username": username,
                    "email": email,
                    "password": password
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "registration failed");

        let response = self
            .post(
                "/api/v1/auth/login",
                json!({
                    "email": email,
                    "password": password
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed");

        response.body["token"]
            .as_str()
            .expect("login response missing token")
            .to_string()
    }
}

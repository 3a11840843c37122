use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playshelf_core::{
    load_config, validate_config, CollectionStore, GameCacheStore, GameService, GameSource,
    RawgClient, SqliteCollectionStore, SqliteGameCache, SqliteUserStore, UserStore,
};

use playshelf_server::api::create_router;
use playshelf_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("PLAYSHELF_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Playshelf v{}", VERSION);
    info!("Database path: {:?}", config.database.path);

    // Log a config fingerprint so drift between instances is diagnosable
    // without dumping secrets.
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Create SQLite stores. Order matters on a fresh database: the
    // collection tables reference users and game_cache.
    let users: Arc<dyn UserStore> = Arc::new(
        SqliteUserStore::new(&config.database.path).context("Failed to create user store")?,
    );
    info!("User store initialized");

    let cache: Arc<dyn GameCacheStore> = Arc::new(
        SqliteGameCache::new(&config.database.path).context("Failed to create game cache")?,
    );
    info!(
        "Game cache initialized ({} entries)",
        cache.count().unwrap_or(0)
    );

    let collections: Arc<dyn CollectionStore> = Arc::new(
        SqliteCollectionStore::new(&config.database.path)
            .context("Failed to create collection store")?,
    );
    info!("Collection store initialized");

    // Create the RAWG client
    let remote: Arc<dyn GameSource> = Arc::new(
        RawgClient::new(config.remote.clone()).context("Failed to create RAWG client")?,
    );
    info!("Remote catalog client initialized");

    // The game service is the single entry point for record resolution;
    // lookups and membership writes all funnel through it.
    let games = GameService::new(
        Arc::clone(&cache),
        Arc::clone(&remote),
        Arc::clone(&collections),
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        games,
        remote,
        users,
        collections,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

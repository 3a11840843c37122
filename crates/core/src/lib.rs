pub mod cache;
pub mod collections;
pub mod config;
pub mod games;
pub mod metrics;
pub mod remote;
pub mod testing;
pub mod users;

pub use cache::{CacheError, CachedGame, GameCacheStore, SqliteGameCache};
pub use collections::{
    CollectionError, CollectionStore, LibraryAddOutcome, Membership, SqliteCollectionStore,
    ToggleOutcome,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    RemoteCatalogConfig, SanitizedConfig, ServerConfig,
};
pub use games::{GameService, GameServiceError, FRESHNESS_TTL_DAYS};
pub use remote::{
    GamePage, GameQuery, GameRecord, GameSource, GameSummary, GenreRecord, PlatformRecord,
    RawgClient, RemoteCatalogError,
};
pub use users::{NewUser, SqliteUserStore, User, UserError, UserStore};

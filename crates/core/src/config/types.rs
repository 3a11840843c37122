use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Remote game catalog (RAWG) access. Required - the app is useless without it.
    pub remote: RemoteCatalogConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("playshelf.db")
}

/// Remote game catalog (RAWG-compatible API) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteCatalogConfig {
    /// API key for the upstream catalog service.
    pub api_key: String,
    /// Base URL (default: https://api.rawg.io/api).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub remote: SanitizedRemoteConfig,
}

/// Sanitized remote catalog config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRemoteConfig {
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            remote: SanitizedRemoteConfig {
                base_url: config.remote.base_url.clone(),
                api_key_configured: !config.remote.api_key.is_empty(),
                timeout_secs: config.remote.timeout_secs,
            },
        }
    }
}

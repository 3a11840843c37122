use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Remote API key is non-empty
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.remote.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "remote.api_key cannot be empty".to_string(),
        ));
    }

    if config.remote.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "remote.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

//! Configuration loading from disk and the environment.
//!
//! Precedence: environment overrides > config file > built-in defaults.

use std::fs;
use std::path::Path;

use crate::config::schema::BillboardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the indexer GraphQL endpoint.
pub const INDEXER_URL_ENV_VAR: &str = "BILLBOARD_INDEXER_URL";
/// Environment variable overriding the sponsorship API key.
pub const SPONSOR_API_KEY_ENV_VAR: &str = "BILLBOARD_SPONSOR_API_KEY";
/// Environment variable overriding the network selector.
pub const NETWORK_ENV_VAR: &str = "BILLBOARD_NETWORK";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a configuration file, apply environment overrides, and validate.
pub fn load_config(path: &Path) -> Result<BillboardConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: BillboardConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration without a file: defaults plus environment overrides.
pub fn load_default() -> Result<BillboardConfig, ConfigError> {
    let mut config = BillboardConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut BillboardConfig) {
    if let Ok(url) = std::env::var(INDEXER_URL_ENV_VAR) {
        if !url.is_empty() {
            config.indexer.url = url;
        }
    }
    if let Ok(key) = std::env::var(SPONSOR_API_KEY_ENV_VAR) {
        if !key.is_empty() {
            config.sponsor.api_key = key;
        }
    }
    if let Ok(network) = std::env::var(NETWORK_ENV_VAR) {
        if !network.is_empty() {
            config.network = network;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/billboard.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = std::env::temp_dir().join("billboard-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "network = [unclosed").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_validates_semantics() {
        let dir = std::env::temp_dir().join("billboard-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("invalid.toml");
        std::fs::write(&path, "[rate_limit]\nwindow_secs = 0\n").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}

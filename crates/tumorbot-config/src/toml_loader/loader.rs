//! Core TOML config loading: read from path or platform default.

use crate::schema::TumorbotConfig;
use crate::validation;
use std::path::Path;
use tracing::{info, warn};
use tumorbot_common::ConfigError;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// Validation problems are only logged; `load_config` is the strict entry
/// point that turns them into errors.
pub fn load_from_path(path: &Path) -> Result<TumorbotConfig, ConfigError> {
    read_from_path(path).map(warn_if_invalid)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/tumorbot/config.toml`
/// On Linux: `~/.config/tumorbot/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<TumorbotConfig, ConfigError> {
    read_default().map(warn_if_invalid)
}

/// Read and parse a config file without validating it.
pub(crate) fn read_from_path(path: &Path) -> Result<TumorbotConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: TumorbotConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Like [`read_from_path`] on the default path, creating the file if absent.
pub(crate) fn read_default() -> Result<TumorbotConfig, ConfigError> {
    let path = default_config_path()?;

    match read_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(TumorbotConfig::default())
        }
        Err(e) => Err(e),
    }
}

fn warn_if_invalid(config: TumorbotConfig) -> TumorbotConfig {
    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }
    config
}

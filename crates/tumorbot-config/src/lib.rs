//! tumorbot configuration system.
//!
//! TOML-based configuration with full validation. All config sections use
//! sensible defaults so partial configs work out of the box. Secrets are
//! never stored in the file; see [`credentials`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tumorbot_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::resolve_api_key;
pub use schema::{LogLevel, TumorbotConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use tumorbot_common::ConfigError;

/// Load and validate the config.
///
/// With `path` set, that file must exist. Otherwise `config.toml` is read
/// from the OS config directory, and a commented default is created if
/// none exists.
pub fn load_config(path: Option<&Path>) -> Result<TumorbotConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::read_from_path(path)?,
        None => toml_loader::read_default()?,
    };

    // Validated once here; the lenient loaders would only warn.
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TumorbotConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::TumorbotConfig;
use tumorbot_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TumorbotConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_provider(&mut errors, config);
    sections::validate_references(&mut errors, config);
    sections::validate_session(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

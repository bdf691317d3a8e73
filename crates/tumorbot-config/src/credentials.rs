//! API key resolution.
//!
//! The key is looked up in the environment variable named by
//! `provider.api_key_env`, then in `CO_API_KEY` (the variable Cohere's own
//! SDKs read). Blank values count as unset.

use tumorbot_common::ConfigError;

use crate::schema::ProviderConfig;

/// Fallback variable consulted when the configured one is unset.
pub const FALLBACK_API_KEY_ENV: &str = "CO_API_KEY";

/// Resolve the provider API key from the process environment.
pub fn resolve_api_key(provider: &ProviderConfig) -> Result<String, ConfigError> {
    resolve_api_key_with(provider, |name| std::env::var(name).ok())
}

/// Resolve the provider API key through an arbitrary variable lookup.
pub fn resolve_api_key_with(
    provider: &ProviderConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    [provider.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
        .into_iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingCredential(provider.api_key_env.clone()))
}

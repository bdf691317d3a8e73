//! Per-section validators.

use crate::schema::TumorbotConfig;

use super::helpers::{validate_http_url, validate_range, validate_range_f64};

pub(crate) fn validate_provider(errors: &mut Vec<String>, config: &TumorbotConfig) {
    let provider = &config.provider;
    if provider.model.trim().is_empty() {
        errors.push("provider.model must not be empty".into());
    }
    if provider.api_key_env.trim().is_empty() {
        errors.push("provider.api_key_env must not be empty".into());
    }
    validate_range(
        errors,
        "provider.max_tokens",
        u64::from(provider.max_tokens),
        1,
        4096,
    );
    validate_range_f64(
        errors,
        "provider.temperature",
        provider.temperature,
        0.0,
        1.0,
    );
    validate_http_url(errors, "provider.api_base", &provider.api_base);
    if let Some(secs) = provider.request_timeout_secs {
        validate_range(errors, "provider.request_timeout_secs", secs, 1, 600);
    }
}

pub(crate) fn validate_references(errors: &mut Vec<String>, config: &TumorbotConfig) {
    validate_range(
        errors,
        "references.fetch_timeout_secs",
        config.references.fetch_timeout_secs,
        1,
        120,
    );
    for (i, source) in config.references.sources.iter().enumerate() {
        validate_http_url(errors, &format!("references.sources[{i}]"), source);
    }
}

pub(crate) fn validate_session(errors: &mut Vec<String>, config: &TumorbotConfig) {
    validate_range(
        errors,
        "session.history_limit",
        config.session.history_limit as u64,
        2,
        200,
    );
    validate_range(
        errors,
        "session.idle_ttl_secs",
        config.session.idle_ttl_secs,
        60,
        86_400,
    );
}

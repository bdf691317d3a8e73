//! Cohere API client configuration.

use std::fmt;
use std::time::Duration;

use super::client::COHERE_API_URL;

/// Cohere API client configuration.
#[derive(Clone)]
pub struct CohereConfig {
    pub api_key: String,
    pub api_base: String,
    /// Whole-request timeout. `None` leaves the chat call unbounded.
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for CohereConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CohereConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl CohereConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: COHERE_API_URL.to_string(),
            request_timeout: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

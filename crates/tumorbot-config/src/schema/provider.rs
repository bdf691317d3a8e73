use serde::{Deserialize, Serialize};

/// Chat-completion provider settings.
///
/// The API key itself never lives in the config file; `api_key_env`
/// names the environment variable it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Upper bound on generated tokens per reply.
    pub max_tokens: u32,
    pub temperature: f64,
    /// Chat endpoint URL.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Optional whole-request timeout. `None` leaves the provider call unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "command-r-plus".into(),
            max_tokens: 1000,
            temperature: 0.3,
            api_base: "https://api.cohere.com/v2/chat".into(),
            api_key_env: "COHERE_API_KEY".into(),
            request_timeout_secs: None,
        }
    }
}

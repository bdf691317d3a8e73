//! Session settings.

/// Per-session request and history parameters.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Model identifier sent with every request.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Turns kept after each exchange.
    pub history_limit: usize,
    /// Reference URLs fetched before every exchange.
    pub sources: Vec<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model: "command-r-plus".into(),
            max_tokens: 1000,
            temperature: 0.3,
            history_limit: 10,
            sources: Vec::new(),
        }
    }
}

impl SessionSettings {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }
}

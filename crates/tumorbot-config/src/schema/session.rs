use serde::{Deserialize, Serialize};

/// Conversation history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Turns kept after each exchange; older turns are dropped.
    pub history_limit: usize,
    /// Idle conversations older than this are reaped from the session store.
    pub idle_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: 10,
            idle_ttl_secs: 1800,
        }
    }
}

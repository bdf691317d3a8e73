//! Chat engine for tumorbot.
//!
//! Provides:
//! - A Cohere chat client (plain and SSE streaming)
//! - Reference-source fetching that grounds every exchange
//! - Prompt templates and patient-context turns
//! - Bounded conversation sessions with per-session locking
//! - An id-keyed store for concurrent conversations
//! - Token usage tracking

pub mod bot;
pub mod cohere;
pub mod prompts;
pub mod references;
pub mod session;
pub mod store;
pub mod streaming;
pub mod token_tracker;

#[cfg(test)]
mod test_support;

use async_trait::async_trait;

pub use bot::TumorBot;
pub use cohere::{CohereClient, CohereConfig};
pub use prompts::PatientContext;
pub use references::{ContextSnippet, FetchError, HttpFetcher, ReferenceFetcher};
pub use session::{Session, SessionSettings};
pub use store::SessionStore;
pub use token_tracker::TokenTracker;

/// Callback receiving streamed text chunks as they arrive.
pub type ChunkCallback = Box<dyn Fn(String) + Send + Sync>;

#[async_trait]
pub trait AiClient: Send + Sync {
    /// Name used to attribute token usage.
    fn provider_name(&self) -> &str;

    async fn send_message(&self, request: &ChatRequest) -> Result<AiResponse, AiError>;

    async fn send_message_streaming(
        &self,
        request: &ChatRequest,
        on_chunk: ChunkCallback,
    ) -> Result<AiResponse, AiError>;
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One chat-completion call: the ordered turns plus the grounding context.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    /// Concatenated reference snippets; empty when nothing was fetched.
    pub context: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else if e.is_decode() {
            AiError::ParseError(e.to_string())
        } else {
            AiError::NetworkError(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
        assert_eq!(Role::System.as_str(), "system");
    }

    #[test]
    fn total_tokens_saturates() {
        let usage = TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 5,
        };
        assert_eq!(usage.total_tokens(), u64::MAX);
    }

    #[test]
    fn error_display() {
        assert_eq!(AiError::RateLimited.to_string(), "Rate limited");
        assert_eq!(
            AiError::ApiError("HTTP 500: boom".into()).to_string(),
            "API error: HTTP 500: boom"
        );
        assert_eq!(AiError::Timeout.to_string(), "Timeout");
    }
}

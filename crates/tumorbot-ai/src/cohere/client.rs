//! Cohere API client struct, request building, and response parsing.

use std::time::Duration;

use crate::{AiError, AiResponse, ChatRequest, TokenUsage};

use super::config::CohereConfig;

pub const COHERE_API_URL: &str = "https://api.cohere.com/v2/chat";

/// Document id under which the reference context is attached.
pub(crate) const CONTEXT_DOCUMENT_ID: &str = "reference-context";

/// Cohere API client.
pub struct CohereClient {
    pub(crate) config: CohereConfig,
    pub(crate) http: reqwest::Client,
}

impl CohereClient {
    pub fn new(config: CohereConfig) -> Result<Self, AiError> {
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(10));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Build the JSON request body for the v2 Chat API.
    pub(crate) fn build_request_body(&self, request: &ChatRequest, stream: bool) -> serde_json::Value {
        let messages: Vec<_> = request
            .messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "content": msg.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        if !request.context.is_empty() {
            body["documents"] = serde_json::json!([{
                "id": CONTEXT_DOCUMENT_ID,
                "data": { "text": request.context },
            }]);
        }

        if stream {
            body["stream"] = serde_json::json!(true);
        }

        body
    }

    /// Parse a non-streaming response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let blocks = json["message"]["content"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("no message content in response".to_string()))?;

        let texts: Vec<&str> = blocks
            .iter()
            .filter(|b| b["type"] == "text")
            .filter_map(|b| b["text"].as_str())
            .collect();
        if texts.is_empty() {
            return Err(AiError::ParseError(
                "no text blocks in message content".to_string(),
            ));
        }

        Ok(AiResponse {
            content: texts.concat(),
            usage: parse_usage(&json["usage"]),
        })
    }
}

/// Read token counts from a `usage` object, preferring `tokens` over
/// `billed_units`.
pub(crate) fn parse_usage(usage: &serde_json::Value) -> TokenUsage {
    let pick = |field: &str| {
        usage["tokens"][field]
            .as_f64()
            .or_else(|| usage["billed_units"][field].as_f64())
            .map(|n| n as u64)
            .unwrap_or(0)
    };
    TokenUsage {
        input_tokens: pick("input_tokens"),
        output_tokens: pick("output_tokens"),
    }
}

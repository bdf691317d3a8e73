//! AiClient trait implementation for CohereClient (send_message + streaming).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::streaming::{parse_sse_stream, SseEvent};
use crate::{AiClient, AiError, AiResponse, ChatRequest, ChunkCallback, TokenUsage};

use super::client::{parse_usage, CohereClient};

impl CohereClient {
    /// POST the request and map non-success statuses to errors.
    async fn post(&self, body: &serde_json::Value) -> Result<reqwest::Response, AiError> {
        let response = self
            .http
            .post(&self.config.api_base)
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        Ok(response)
    }
}

#[async_trait]
impl AiClient for CohereClient {
    fn provider_name(&self) -> &str {
        "cohere"
    }

    async fn send_message(&self, request: &ChatRequest) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(request, false);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            context_bytes = request.context.len(),
            "Cohere API request"
        );

        let response = self.post(&body).await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }

    async fn send_message_streaming(
        &self,
        request: &ChatRequest,
        on_chunk: ChunkCallback,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(request, true);

        debug!(model = %request.model, "Cohere API streaming request");

        let response = self.post(&body).await?;

        let mut full_content = String::new();
        let mut usage = TokenUsage::default();
        let mut saw_end = false;

        parse_sse_stream(response, |event: SseEvent| {
            let Ok(data) = serde_json::from_str::<serde_json::Value>(&event.data) else {
                return;
            };
            // v2 streams name the event both in the SSE header and in `type`.
            let event_type = event
                .event
                .as_deref()
                .or_else(|| data["type"].as_str())
                .unwrap_or("");

            match event_type {
                "content-delta" => {
                    if let Some(text) = data["delta"]["message"]["content"]["text"].as_str() {
                        if !text.is_empty() {
                            full_content.push_str(text);
                            on_chunk(text.to_string());
                        }
                    }
                }
                "message-end" => {
                    usage = parse_usage(&data["delta"]["usage"]);
                    saw_end = true;
                }
                _ => {}
            }
        })
        .await?;

        // A stream cut before `message-end` is incomplete; never commit it.
        if !saw_end {
            warn!(
                received_bytes = full_content.len(),
                "Cohere stream ended without a message-end event"
            );
            return Err(AiError::NetworkError(
                "stream ended without message-end".to_string(),
            ));
        }

        Ok(AiResponse {
            content: full_content,
            usage,
        })
    }
}

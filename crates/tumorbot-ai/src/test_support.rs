//! In-memory collaborators for unit tests.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::references::{placeholder_content, FetchError, ReferenceFetcher};
use crate::{AiClient, AiError, AiResponse, ChatRequest, ChunkCallback, Role, TokenUsage};

/// Client that replays scripted outcomes, then echoes the last user turn.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) fn push_ok(&self, reply: &str) {
        self.script.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub(crate) fn push_err(&self, err: AiError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> ChatRequest {
        self.requests().pop().expect("no request was sent")
    }

    async fn respond(&self, request: &ChatRequest) -> Result<AiResponse, AiError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.script.lock().unwrap().pop_front();
        let content = match scripted {
            Some(outcome) => outcome?,
            None => echo(request),
        };
        Ok(AiResponse {
            content,
            usage: TokenUsage {
                input_tokens: request.messages.len() as u64,
                output_tokens: 1,
            },
        })
    }
}

pub(crate) fn echo(request: &ChatRequest) -> String {
    let last_user = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or("");
    format!("reply to {last_user}")
}

#[async_trait]
impl AiClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn send_message(&self, request: &ChatRequest) -> Result<AiResponse, AiError> {
        self.respond(request).await
    }

    async fn send_message_streaming(
        &self,
        request: &ChatRequest,
        on_chunk: ChunkCallback,
    ) -> Result<AiResponse, AiError> {
        let response = self.respond(request).await?;
        for word in response.content.split_inclusive(' ') {
            on_chunk(word.to_string());
        }
        Ok(response)
    }
}

/// Fetcher that fails for a configurable set of URLs.
#[derive(Default)]
pub(crate) struct StaticFetcher {
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub(crate) fn heal(&self, url: &str) {
        self.failing.lock().unwrap().remove(url);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(url) {
            return Err(FetchError::Network {
                url: url.to_string(),
                message: "connection refused".into(),
            });
        }
        Ok(placeholder_content(url))
    }
}

pub(crate) fn sources(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("https://ref{i}.example/brain")).collect()
}

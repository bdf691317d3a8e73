//! Reference sources that ground each exchange.
//!
//! Every refresh fetches each configured URL in order. Pages are only
//! checked for reachability: a reachable source contributes a placeholder
//! snippet naming it, nothing is extracted from the body. A source that
//! fails is logged and skipped so one bad page never blocks a reply.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::AiError;

/// Content recorded for one reference source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnippet {
    pub source: String,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("timed out fetching {0}")]
    Timeout(String),
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },
}

/// Fetches raw content for one reference URL.
#[async_trait]
pub trait ReferenceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Text recorded for a reachable source.
pub fn placeholder_content(url: &str) -> String {
    format!("Medical information from {url}")
}

/// `ReferenceFetcher` backed by plain HTTP GETs with a per-request timeout.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ReferenceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(placeholder_content(url))
    }
}

/// Fetch every source in order, skipping the ones that fail.
pub async fn refresh(fetcher: &dyn ReferenceFetcher, sources: &[String]) -> Vec<ContextSnippet> {
    let mut snippets = Vec::with_capacity(sources.len());
    for url in sources {
        match fetcher.fetch(url).await {
            Ok(content) => snippets.push(ContextSnippet {
                source: url.clone(),
                content,
            }),
            Err(e) => warn!(source = %url, error = %e, "skipping reference source"),
        }
    }
    debug!(
        fetched = snippets.len(),
        configured = sources.len(),
        "reference context refreshed"
    );
    snippets
}

/// Concatenate snippets into the single context string sent to the provider.
pub fn render_context(snippets: &[ContextSnippet]) -> String {
    snippets
        .iter()
        .map(|s| format!("Source: {}\n{}\n\n", s.source, s.content))
        .collect()
}

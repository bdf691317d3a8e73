//! `TumorBot`: a lockable conversation plus its collaborators.
//!
//! The session mutex is held for the whole exchange (refresh, provider
//! call, commit), so concurrent callers on one bot are served strictly one
//! after another and their turns never interleave. Separate bots (see
//! `SessionStore`) do not contend with each other.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::prompts::{self, PatientContext};
use crate::references::{ContextSnippet, ReferenceFetcher};
use crate::session::{Session, SessionSettings};
use crate::{AiClient, AiError, ChunkCallback, Message, TokenTracker};

pub struct TumorBot {
    client: Arc<dyn AiClient>,
    fetcher: Arc<dyn ReferenceFetcher>,
    session: Mutex<Session>,
}

impl TumorBot {
    pub fn new(
        client: Arc<dyn AiClient>,
        fetcher: Arc<dyn ReferenceFetcher>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            client,
            fetcher,
            session: Mutex::new(Session::new(settings)),
        }
    }

    /// Re-fetch the reference sources and return the new snippet list.
    pub async fn refresh_context(&self) -> Vec<ContextSnippet> {
        let mut session = self.session.lock().await;
        session.refresh_context(self.fetcher.as_ref()).await
    }

    /// Send a user message, optionally with a patient-context turn.
    pub async fn exchange(
        &self,
        user_message: impl Into<String>,
        patient: Option<PatientContext>,
    ) -> Result<String, AiError> {
        let mut session = self.session.lock().await;
        session
            .exchange(
                self.client.as_ref(),
                self.fetcher.as_ref(),
                user_message,
                patient.as_ref(),
            )
            .await
    }

    /// Streaming variant of [`exchange`](Self::exchange).
    pub async fn exchange_streaming(
        &self,
        user_message: impl Into<String>,
        patient: Option<PatientContext>,
        on_chunk: ChunkCallback,
    ) -> Result<String, AiError> {
        let mut session = self.session.lock().await;
        session
            .exchange_streaming(
                self.client.as_ref(),
                self.fetcher.as_ref(),
                user_message,
                patient.as_ref(),
                on_chunk,
            )
            .await
    }

    /// Overview of a tumor type. Pass `""` / `0.0` for unknown location / size.
    pub async fn explain_tumor_type(
        &self,
        tumor_type: &str,
        location: &str,
        size: f64,
    ) -> Result<String, AiError> {
        let prompt = prompts::tumor_info_prompt(tumor_type, location, size);
        let patient = PatientContext::from_parts(tumor_type, location, size);
        self.exchange(prompt, Some(patient)).await
    }

    pub async fn list_treatment_options(&self, tumor_type: &str) -> Result<String, AiError> {
        let prompt = prompts::treatment_prompt(tumor_type);
        self.exchange(prompt, Some(PatientContext::new(tumor_type)))
            .await
    }

    pub async fn list_symptoms(&self, tumor_type: &str, location: &str) -> Result<String, AiError> {
        let prompt = prompts::symptoms_prompt(tumor_type, location);
        let patient = PatientContext::new(tumor_type).with_location(location);
        self.exchange(prompt, Some(patient)).await
    }

    /// Chart-ready figures for a tumor type. Sent without patient context.
    pub async fn visualization_data(&self, tumor_type: &str) -> Result<String, AiError> {
        self.exchange(prompts::visualization_prompt(tumor_type), None)
            .await
    }

    /// Snapshot of the committed history.
    pub async fn history(&self) -> Vec<Message> {
        self.session.lock().await.history().to_vec()
    }

    /// Snippets from the most recent refresh.
    pub async fn snippets(&self) -> Vec<ContextSnippet> {
        self.session.lock().await.snippets().to_vec()
    }

    pub async fn usage(&self) -> TokenTracker {
        self.session.lock().await.tracker().clone()
    }

    /// Drop the conversation history; usage counters are kept.
    pub async fn reset(&self) {
        self.session.lock().await.clear();
    }

    /// Last activity time, or `None` while an exchange is in flight.
    pub(crate) fn idle_since(&self) -> Option<Instant> {
        self.session.try_lock().ok().map(|s| s.last_active())
    }
}

//! Async exchange methods for Session (plain + streaming).

use tracing::debug;
use tumorbot_common::new_correlation_id;

use crate::prompts::PatientContext;
use crate::references::{self, ContextSnippet, ReferenceFetcher};
use crate::{AiClient, AiError, ChunkCallback, Message};

use super::manager::Session;

impl Session {
    /// Re-fetch every reference source, replacing the previous snippets.
    pub async fn refresh_context(&mut self, fetcher: &dyn ReferenceFetcher) -> Vec<ContextSnippet> {
        self.snippets = references::refresh(fetcher, &self.settings.sources).await;
        self.snippets.clone()
    }

    /// Send a user message and return the assistant's reply.
    ///
    /// History only changes when the provider call succeeds.
    pub async fn exchange(
        &mut self,
        client: &dyn AiClient,
        fetcher: &dyn ReferenceFetcher,
        user_message: impl Into<String>,
        patient: Option<&PatientContext>,
    ) -> Result<String, AiError> {
        let exchange_id = new_correlation_id();
        let pending = self.prepare(fetcher, user_message.into(), patient).await;
        let request = self.build_request(&pending);

        debug!(
            exchange = %exchange_id,
            history = self.history.len(),
            snippets = self.snippets.len(),
            "sending exchange"
        );

        let response = client.send_message(&request).await.inspect_err(|e| {
            debug!(exchange = %exchange_id, error = %e, "exchange failed, history unchanged");
        })?;

        Ok(self.commit(client.provider_name(), pending, response))
    }

    /// Like `exchange`, forwarding reply text to `on_chunk` as it streams.
    pub async fn exchange_streaming(
        &mut self,
        client: &dyn AiClient,
        fetcher: &dyn ReferenceFetcher,
        user_message: impl Into<String>,
        patient: Option<&PatientContext>,
        on_chunk: ChunkCallback,
    ) -> Result<String, AiError> {
        let exchange_id = new_correlation_id();
        let pending = self.prepare(fetcher, user_message.into(), patient).await;
        let request = self.build_request(&pending);

        debug!(exchange = %exchange_id, "sending streaming exchange");

        let response = client
            .send_message_streaming(&request, on_chunk)
            .await
            .inspect_err(|e| {
                debug!(exchange = %exchange_id, error = %e, "exchange failed, history unchanged");
            })?;

        Ok(self.commit(client.provider_name(), pending, response))
    }

    /// Refresh references and build the turns this exchange will add.
    async fn prepare(
        &mut self,
        fetcher: &dyn ReferenceFetcher,
        user_message: String,
        patient: Option<&PatientContext>,
    ) -> Vec<Message> {
        self.touch();
        self.refresh_context(fetcher).await;

        let mut pending = Vec::with_capacity(2);
        if let Some(patient) = patient {
            pending.push(patient.to_message());
        }
        pending.push(Message::user(user_message));
        pending
    }
}

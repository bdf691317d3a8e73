//! Session struct, request assembly, and history bookkeeping.

use std::time::Instant;

use crate::prompts::SYSTEM_INSTRUCTION;
use crate::references::{render_context, ContextSnippet};
use crate::token_tracker::TokenTracker;
use crate::{AiResponse, ChatRequest, Message};

use super::types::SessionSettings;

/// A conversation with bounded history and the latest reference context.
pub struct Session {
    /// Committed turns, oldest first. Never longer than `history_limit`
    /// after an exchange completes.
    pub(super) history: Vec<Message>,
    /// Result of the most recent refresh.
    pub(super) snippets: Vec<ContextSnippet>,
    pub(super) settings: SessionSettings,
    pub(super) tracker: TokenTracker,
    pub(super) last_active: Instant,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            history: Vec::new(),
            snippets: Vec::new(),
            settings,
            tracker: TokenTracker::new(),
            last_active: Instant::now(),
        }
    }

    /// Assemble the provider request: instruction, history, then the
    /// pending turns of this exchange. Nothing is committed here.
    pub(crate) fn build_request(&self, pending: &[Message]) -> ChatRequest {
        let mut messages = Vec::with_capacity(1 + self.history.len() + pending.len());
        messages.push(Message::system(SYSTEM_INSTRUCTION));
        messages.extend(self.history.iter().cloned());
        messages.extend(pending.iter().cloned());

        ChatRequest {
            messages,
            context: render_context(&self.snippets),
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Apply a successful reply: append the pending turns and the
    /// assistant turn, then trim to the window.
    pub(crate) fn commit(
        &mut self,
        provider: &str,
        pending: Vec<Message>,
        response: AiResponse,
    ) -> String {
        self.tracker.record(provider, &response.usage);
        self.history.extend(pending);
        self.history.push(Message::assistant(response.content.clone()));
        self.trim_history();
        self.touch();
        response.content
    }

    fn trim_history(&mut self) {
        let limit = self.settings.history_limit;
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    pub(crate) fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Committed conversation turns, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Snippets from the most recent refresh.
    pub fn snippets(&self) -> &[ContextSnippet] {
        &self.snippets
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    /// When the last exchange started or committed (or the session was
    /// created).
    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    /// Clear conversation history.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Number of turns in history.
    pub fn message_count(&self) -> usize {
        self.history.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

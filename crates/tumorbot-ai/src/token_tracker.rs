//! Token usage tracking per session and provider.

use std::collections::HashMap;
use std::fmt;

use crate::TokenUsage;

/// Cumulative token usage for one session.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    by_provider: HashMap<String, TokenUsage>,
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from one successful provider call.
    pub fn record(&mut self, provider: &str, usage: &TokenUsage) {
        add(&mut self.total, usage);
        add(self.by_provider.entry(provider.to_string()).or_default(), usage);
        self.call_count += 1;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn for_provider(&self, provider: &str) -> Option<&TokenUsage> {
        self.by_provider.get(provider)
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn add(acc: &mut TokenUsage, usage: &TokenUsage) {
    acc.input_tokens = acc.input_tokens.saturating_add(usage.input_tokens);
    acc.output_tokens = acc.output_tokens.saturating_add(usage.output_tokens);
}

impl fmt::Display for TokenTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} calls, {} input + {} output = {} tokens",
            self.call_count,
            self.total.input_tokens,
            self.total.output_tokens,
            self.total_tokens()
        )
    }
}

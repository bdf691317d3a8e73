//! Session store: maps conversation ids to their `TumorBot`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::info;
use tumorbot_common::SessionId;

use crate::references::ReferenceFetcher;
use crate::session::SessionSettings;
use crate::{AiClient, TumorBot};

/// Thread-safe conversation store.
///
/// All conversations share one provider client and fetcher; each owns its
/// history and lock.
#[derive(Clone)]
pub struct SessionStore {
    client: Arc<dyn AiClient>,
    fetcher: Arc<dyn ReferenceFetcher>,
    settings: SessionSettings,
    sessions: Arc<RwLock<HashMap<SessionId, Arc<TumorBot>>>>,
}

impl SessionStore {
    pub fn new(
        client: Arc<dyn AiClient>,
        fetcher: Arc<dyn ReferenceFetcher>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            client,
            fetcher,
            settings,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return the conversation for `id`, creating it on first use.
    pub async fn get_or_create(&self, id: &SessionId) -> Arc<TumorBot> {
        if let Some(bot) = self.get(id).await {
            return bot;
        }
        let mut map = self.sessions.write().await;
        map.entry(id.clone())
            .or_insert_with(|| {
                info!(session_id = %id, "creating conversation");
                Arc::new(TumorBot::new(
                    self.client.clone(),
                    self.fetcher.clone(),
                    self.settings.clone(),
                ))
            })
            .clone()
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<TumorBot>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Remove a conversation. Returns true if it existed.
    pub async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop conversations idle for longer than `max_age`. Conversations with
    /// an exchange in flight are never reaped. Returns how many were dropped.
    pub async fn reap_idle(&self, max_age: Duration) -> usize {
        let mut map = self.sessions.write().await;
        let now = Instant::now();
        let before = map.len();
        map.retain(|id, bot| {
            let stale = bot
                .idle_since()
                .is_some_and(|since| now.duration_since(since) > max_age);
            if stale {
                info!(session_id = %id, "reaping idle conversation");
            }
            !stale
        });
        before - map.len()
    }

    pub async fn exists(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Number of live conversations.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

//! Keyed agent storage with per-key get-or-create.
//!
//! Entries live until the host invalidates them. Two callers asking for the
//! same missing id concurrently build it once; distinct ids never wait on
//! each other's construction.

use crate::agent::Agent;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

/// A cached agent. The mutex serialises chats against one agent.
pub type SharedAgent = Arc<Mutex<Agent>>;

#[derive(Debug, Default)]
pub struct AgentCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<SharedAgent>>>>,
}

impl AgentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached agent for `agent_id`, building it with `build` if absent.
    ///
    /// A failed build caches nothing; the next call retries.
    pub async fn get_or_create<F, Fut, E>(&self, agent_id: &str, build: F) -> Result<SharedAgent, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Agent, E>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(agent_id.to_string()).or_default())
        };

        let result = cell
            .get_or_try_init(|| async {
                info!(agent = agent_id, "Building agent");
                build().await.map(|agent| Arc::new(Mutex::new(agent)))
            })
            .await;

        match result {
            Ok(agent) => Ok(Arc::clone(agent)),
            Err(err) => {
                let mut entries = self.entries.lock().await;
                let stale = entries
                    .get(agent_id)
                    .is_some_and(|current| Arc::ptr_eq(current, &cell) && current.get().is_none());
                if stale {
                    entries.remove(agent_id);
                }
                Err(err)
            }
        }
    }

    pub async fn get(&self, agent_id: &str) -> Option<SharedAgent> {
        let entries = self.entries.lock().await;
        entries.get(agent_id)?.get().cloned()
    }

    /// Forward a context change to a cached agent.
    ///
    /// Returns `None` when the agent is not cached, otherwise whether its
    /// memory was reseeded.
    pub async fn update_context(&self, agent_id: &str, context: Vec<String>) -> Option<bool> {
        let agent = self.get(agent_id).await?;
        let mut agent = agent.lock().await;
        Some(agent.update_context(context))
    }

    /// Drop one entry. Callers holding the agent keep their handle.
    pub async fn invalidate(&self, agent_id: &str) -> bool {
        let removed = self.entries.lock().await.remove(agent_id).is_some();
        if removed {
            debug!(agent = agent_id, "Agent cache entry invalidated");
        }
        removed
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of built agents.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Ids of built agents, sorted.
    pub async fn ids(&self) -> Vec<String> {
        let entries = self.entries.lock().await;
        let mut ids: Vec<String> = entries
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

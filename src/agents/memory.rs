use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::VotaResult;
use crate::providers::Message;

/// Conversation state of one thread after a completed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub thread_id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Latest checkpoint of the thread, if any.
    async fn get(&self, thread_id: &str) -> VotaResult<Option<Checkpoint>>;
    async fn put(&self, thread_id: &str, messages: Vec<Message>) -> VotaResult<Checkpoint>;
    /// All checkpoints of the thread, oldest first.
    async fn list(&self, thread_id: &str) -> VotaResult<Vec<Checkpoint>>;
}

/// Process-local checkpointer; everything is lost on exit.
#[derive(Default)]
pub struct MemorySaver {
    threads: RwLock<HashMap<String, Vec<Checkpoint>>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn get(&self, thread_id: &str) -> VotaResult<Option<Checkpoint>> {
        let threads = self.threads.read().await;
        Ok(threads.get(thread_id).and_then(|cps| cps.last().cloned()))
    }

    async fn put(&self, thread_id: &str, messages: Vec<Message>) -> VotaResult<Checkpoint> {
        let checkpoint = Checkpoint {
            id: Uuid::new_v4().to_string(),
            thread_id: thread_id.to_string(),
            messages,
            created_at: Utc::now(),
        };
        debug!(
            "Checkpoint {} for thread {} ({} messages)",
            checkpoint.id,
            thread_id,
            checkpoint.messages.len()
        );

        let mut threads = self.threads.write().await;
        threads.entry(thread_id.to_string()).or_default().push(checkpoint.clone());
        Ok(checkpoint)
    }

    async fn list(&self, thread_id: &str) -> VotaResult<Vec<Checkpoint>> {
        let threads = self.threads.read().await;
        Ok(threads.get(thread_id).cloned().unwrap_or_default())
    }
}

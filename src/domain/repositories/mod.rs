use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{Message, MessageId};

/// Storage contract consumed by the dispatch pipeline.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Pending messages, oldest `created_at` first, at most `limit`.
    async fn get_pending_messages(&self, limit: u32) -> anyhow::Result<Vec<Message>>;

    async fn mark_as_sent(
        &self,
        id: MessageId,
        external_message_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    async fn mark_as_failed(&self, id: MessageId, reason: &str) -> anyhow::Result<()>;

    /// Sent messages, newest `sent_at` first.
    async fn list_sent_messages(&self, limit: u32, offset: u32) -> anyhow::Result<Vec<Message>>;
}

/// Best-effort mirror of sent messages. Never authoritative.
#[async_trait]
pub trait SentMessageCache: Send + Sync {
    async fn cache_sent_message(
        &self,
        id: MessageId,
        external_message_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{
    errors::DomainError,
    models::{Message, MessageId, MessageStatus},
    repositories::MessageRepository,
};

struct Inner {
    messages: Vec<Message>,
    next_id: MessageId,
}

/// Process-local store for development runs without a database.
pub struct InMemoryMessageRepository {
    inner: Mutex<Inner>,
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                messages: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with a few pending sample messages.
    pub async fn seeded() -> Self {
        let repo = Self::new();
        repo.add_message("+905551111111", "Insider - Project 1").await;
        repo.add_message("+905552222222", "Insider - Project 2").await;
        repo.add_message("+905553333333", "Another test message").await;
        repo
    }

    pub async fn add_message(&self, recipient: &str, content: &str) -> MessageId {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.messages.push(Message::new_pending(
            id,
            recipient.to_string(),
            content.to_string(),
        ));
        id
    }

    pub async fn get(&self, id: MessageId) -> Option<Message> {
        let inner = self.inner.lock().await;
        inner.messages.iter().find(|m| m.id == id).cloned()
    }
}

impl Inner {
    fn find_mut(&mut self, id: MessageId) -> Result<&mut Message, DomainError> {
        self.messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::NotFound(id))
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn get_pending_messages(&self, limit: u32) -> anyhow::Result<Vec<Message>> {
        let inner = self.inner.lock().await;
        let mut pending: Vec<&Message> = inner
            .messages
            .iter()
            .filter(|m| m.status.is_pending())
            .collect();
        pending.sort_by_key(|m| (m.created_at, m.id));
        Ok(pending
            .into_iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_as_sent(
        &self,
        id: MessageId,
        external_message_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().await;
        inner
            .find_mut(id)?
            .mark_sent(external_message_id.to_string(), sent_at)?;
        Ok(())
    }

    async fn mark_as_failed(&self, id: MessageId, reason: &str) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().await;
        inner.find_mut(id)?.mark_failed(reason)?;
        Ok(())
    }

    async fn list_sent_messages(&self, limit: u32, offset: u32) -> anyhow::Result<Vec<Message>> {
        let inner = self.inner.lock().await;
        let mut sent: Vec<&Message> = inner
            .messages
            .iter()
            .filter(|m| m.status == MessageStatus::Sent)
            .collect();
        sent.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        Ok(sent
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

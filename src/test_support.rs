use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    application::services::delivery::{DeliveryError, DeliveryReceipt, MessageDelivery},
    domain::{
        models::{Message, MessageId},
        repositories::{MessageRepository, SentMessageCache},
    },
};

/// Delivery double that counts calls and tracks how many run at once.
pub struct StubDelivery {
    fail_with_status: Option<u16>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubDelivery {
    pub fn succeeding() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self::new(Some(status), Duration::ZERO)
    }

    pub fn slow(delay: Duration) -> Self {
        Self::new(None, delay)
    }

    fn new(fail_with_status: Option<u16>, delay: Duration) -> Self {
        Self {
            fail_with_status,
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageDelivery for StubDelivery {
    fn kind(&self) -> &'static str {
        "stub"
    }

    async fn deliver(&self, message: &Message) -> Result<DeliveryReceipt, DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.fail_with_status {
            Some(status) => Err(DeliveryError::UnexpectedStatus(status)),
            None => Ok(DeliveryReceipt {
                external_message_id: format!("stub-{}", message.id),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<Vec<(MessageId, String)>>,
}

impl RecordingCache {
    pub fn entries(&self) -> Vec<(MessageId, String)> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SentMessageCache for RecordingCache {
    async fn cache_sent_message(
        &self,
        id: MessageId,
        external_message_id: &str,
        _sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .push((id, external_message_id.to_string()));
        Ok(())
    }
}

pub struct FailingCache;

#[async_trait]
impl SentMessageCache for FailingCache {
    async fn cache_sent_message(
        &self,
        _id: MessageId,
        _external_message_id: &str,
        _sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        anyhow::bail!("cache unreachable")
    }
}

/// Store that fails every call.
pub struct UnreachableRepository;

#[async_trait]
impl MessageRepository for UnreachableRepository {
    async fn get_pending_messages(&self, _limit: u32) -> anyhow::Result<Vec<Message>> {
        anyhow::bail!("store unreachable")
    }

    async fn mark_as_sent(
        &self,
        _id: MessageId,
        _external_message_id: &str,
        _sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        anyhow::bail!("store unreachable")
    }

    async fn mark_as_failed(&self, _id: MessageId, _reason: &str) -> anyhow::Result<()> {
        anyhow::bail!("store unreachable")
    }

    async fn list_sent_messages(&self, _limit: u32, _offset: u32) -> anyhow::Result<Vec<Message>> {
        anyhow::bail!("store unreachable")
    }
}

/// Wraps a repository and counts batch fetches.
pub struct CountingRepository<R> {
    inner: Arc<R>,
    fetches: AtomicUsize,
}

impl<R> CountingRepository<R> {
    pub fn new(inner: Arc<R>) -> Self {
        Self {
            inner,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: MessageRepository> MessageRepository for CountingRepository<R> {
    async fn get_pending_messages(&self, limit: u32) -> anyhow::Result<Vec<Message>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.get_pending_messages(limit).await
    }

    async fn mark_as_sent(
        &self,
        id: MessageId,
        external_message_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        self.inner.mark_as_sent(id, external_message_id, sent_at).await
    }

    async fn mark_as_failed(&self, id: MessageId, reason: &str) -> anyhow::Result<()> {
        self.inner.mark_as_failed(id, reason).await
    }

    async fn list_sent_messages(&self, limit: u32, offset: u32) -> anyhow::Result<Vec<Message>> {
        self.inner.list_sent_messages(limit, offset).await
    }
}

/// Wraps a repository and refuses to record any outcome for one message.
pub struct UnwritableMessage<R> {
    inner: Arc<R>,
    id: MessageId,
}

impl<R> UnwritableMessage<R> {
    pub fn new(inner: Arc<R>, id: MessageId) -> Self {
        Self { inner, id }
    }
}

#[async_trait]
impl<R: MessageRepository> MessageRepository for UnwritableMessage<R> {
    async fn get_pending_messages(&self, limit: u32) -> anyhow::Result<Vec<Message>> {
        self.inner.get_pending_messages(limit).await
    }

    async fn mark_as_sent(
        &self,
        id: MessageId,
        external_message_id: &str,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if id == self.id {
            anyhow::bail!("write rejected for message {id}");
        }
        self.inner.mark_as_sent(id, external_message_id, sent_at).await
    }

    async fn mark_as_failed(&self, id: MessageId, reason: &str) -> anyhow::Result<()> {
        if id == self.id {
            anyhow::bail!("write rejected for message {id}");
        }
        self.inner.mark_as_failed(id, reason).await
    }

    async fn list_sent_messages(&self, limit: u32, offset: u32) -> anyhow::Result<Vec<Message>> {
        self.inner.list_sent_messages(limit, offset).await
    }
}

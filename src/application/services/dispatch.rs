use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::{
    application::services::delivery::{DeliveryReceipt, MessageDelivery},
    domain::{
        models::{Message, MessageId},
        repositories::{MessageRepository, SentMessageCache},
    },
};

pub const CONTENT_TOO_LONG: &str = "content too long";

/// Outcome counts of one dispatch cycle.
///
/// `fetched` can exceed `sent + failed` when recording an outcome fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub fetched: usize,
    pub sent: usize,
    pub failed: usize,
}

enum Outcome {
    Sent,
    Failed,
    Unrecorded,
}

pub struct DispatchService {
    repo: Arc<dyn MessageRepository>,
    cache: Option<Arc<dyn SentMessageCache>>,
    delivery: Arc<dyn MessageDelivery>,
}

impl DispatchService {
    pub fn new(
        repo: Arc<dyn MessageRepository>,
        cache: Option<Arc<dyn SentMessageCache>>,
        delivery: Arc<dyn MessageDelivery>,
    ) -> Self {
        Self {
            repo,
            cache,
            delivery,
        }
    }

    /// Runs one dispatch cycle over at most `limit` pending messages.
    ///
    /// Only a failed batch fetch is returned as an error. Per-message failures
    /// are recorded on the message itself.
    pub async fn send_pending_messages(&self, limit: u32) -> anyhow::Result<DispatchReport> {
        let messages = self
            .repo
            .get_pending_messages(limit)
            .await
            .context("failed to fetch pending messages")?;

        if messages.is_empty() {
            info!("no pending messages");
            return Ok(DispatchReport::default());
        }

        let mut report = DispatchReport::default();
        for message in messages.into_iter().take(limit as usize) {
            report.fetched += 1;
            match self.process(&message).await {
                Outcome::Sent => report.sent += 1,
                Outcome::Failed => report.failed += 1,
                Outcome::Unrecorded => {}
            }
        }

        info!(
            fetched = report.fetched,
            sent = report.sent,
            failed = report.failed,
            "dispatch cycle finished"
        );
        Ok(report)
    }

    pub async fn list_sent_messages(&self, limit: u32, offset: u32) -> anyhow::Result<Vec<Message>> {
        self.repo.list_sent_messages(limit, offset).await
    }

    async fn process(&self, message: &Message) -> Outcome {
        if message.exceeds_max_length() {
            warn!(
                message_id = message.id,
                length = message.content_length(),
                "content too long, marking failed"
            );
            return self.record_failure(message.id, CONTENT_TOO_LONG).await;
        }

        match self.delivery.deliver(message).await {
            Ok(receipt) => self.record_success(message.id, receipt).await,
            Err(err) => {
                warn!(
                    message_id = message.id,
                    delivery = self.delivery.kind(),
                    error = %err,
                    "delivery failed"
                );
                self.record_failure(message.id, &err.to_string()).await
            }
        }
    }

    async fn record_success(&self, id: MessageId, receipt: DeliveryReceipt) -> Outcome {
        let sent_at = Utc::now();
        if let Err(err) = self
            .repo
            .mark_as_sent(id, &receipt.external_message_id, sent_at)
            .await
        {
            error!(message_id = id, error = %err, "failed to mark message as sent");
            return Outcome::Unrecorded;
        }

        debug!(
            message_id = id,
            external_message_id = %receipt.external_message_id,
            "message sent"
        );

        if let Some(cache) = &self.cache {
            if let Err(err) = cache
                .cache_sent_message(id, &receipt.external_message_id, sent_at)
                .await
            {
                warn!(message_id = id, error = %err, "failed to cache sent message");
            }
        }

        Outcome::Sent
    }

    async fn record_failure(&self, id: MessageId, reason: &str) -> Outcome {
        match self.repo.mark_as_failed(id, reason).await {
            Ok(()) => Outcome::Failed,
            Err(err) => {
                error!(message_id = id, error = %err, "failed to mark message as failed");
                Outcome::Unrecorded
            }
        }
    }
}

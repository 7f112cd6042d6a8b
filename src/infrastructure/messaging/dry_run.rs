use async_trait::async_trait;
use tracing::info;

use crate::{
    application::services::delivery::{
        DeliveryError, DeliveryReceipt, MessageDelivery, generate_external_id,
    },
    domain::models::Message,
};

/// Simulated delivery used when no webhook endpoint is configured.
pub struct DryRunDelivery;

#[async_trait]
impl MessageDelivery for DryRunDelivery {
    fn kind(&self) -> &'static str {
        "dry-run"
    }

    async fn deliver(&self, message: &Message) -> Result<DeliveryReceipt, DeliveryError> {
        info!(
            message_id = message.id,
            to = %message.recipient,
            content = %message.content,
            "(dry-run) would send message"
        );
        Ok(DeliveryReceipt {
            external_message_id: generate_external_id(),
        })
    }
}

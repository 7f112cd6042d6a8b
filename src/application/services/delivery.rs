use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::Message;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub external_message_id: String,
}

#[async_trait]
pub trait MessageDelivery: Send + Sync {
    fn kind(&self) -> &'static str;
    async fn deliver(&self, message: &Message) -> Result<DeliveryReceipt, DeliveryError>;
}

pub fn generate_external_id() -> String {
    Uuid::new_v4().to_string()
}

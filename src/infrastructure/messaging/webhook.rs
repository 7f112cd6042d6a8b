use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    application::services::delivery::{
        DeliveryError, DeliveryReceipt, MessageDelivery, generate_external_id,
    },
    domain::models::Message,
};

pub const AUTH_HEADER: &str = "x-ins-auth-key";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Identifier some endpoints return for every message instead of a unique one.
const PLACEHOLDER_MESSAGE_ID: &str = "static";

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub auth_key: Option<String>,
}

/// Delivers messages by posting them to a webhook endpoint.
pub struct WebhookDelivery {
    http: Client,
    config: WebhookConfig,
}

impl WebhookDelivery {
    pub fn new(config: WebhookConfig) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .user_agent("auto-sender/webhook")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }
}

#[derive(Debug, Serialize)]
struct WebhookRequest<'a> {
    to: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookResponse {
    message_id: Option<String>,
}

fn external_id_from(response: WebhookResponse) -> String {
    match response.message_id {
        Some(id) if !id.is_empty() && id != PLACEHOLDER_MESSAGE_ID => id,
        _ => generate_external_id(),
    }
}

#[async_trait]
impl MessageDelivery for WebhookDelivery {
    fn kind(&self) -> &'static str {
        "webhook"
    }

    async fn deliver(&self, message: &Message) -> Result<DeliveryReceipt, DeliveryError> {
        let mut request = self.http.post(&self.config.url).json(&WebhookRequest {
            to: &message.recipient,
            content: &message.content,
        });
        if let Some(key) = &self.config.auth_key {
            request = request.header(AUTH_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::ACCEPTED {
            return Err(DeliveryError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let payload: WebhookResponse = serde_json::from_slice(&body)?;
        let external_message_id = external_id_from(payload);

        debug!(
            message_id = message.id,
            external_message_id = %external_message_id,
            "webhook accepted message"
        );
        Ok(DeliveryReceipt {
            external_message_id,
        })
    }
}

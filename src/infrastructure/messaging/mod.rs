use std::sync::Arc;

use crate::application::services::delivery::{DeliveryError, MessageDelivery};

pub mod dry_run;
pub mod webhook;

pub use dry_run::DryRunDelivery;
pub use webhook::{WebhookConfig, WebhookDelivery};

/// Webhook delivery when an endpoint is configured, dry-run otherwise.
pub fn delivery_for(config: Option<WebhookConfig>) -> Result<Arc<dyn MessageDelivery>, DeliveryError> {
    Ok(match config {
        Some(config) => Arc::new(WebhookDelivery::new(config)?),
        None => Arc::new(DryRunDelivery),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_delivery_by_configuration() {
        assert_eq!(delivery_for(None).unwrap().kind(), "dry-run");

        let webhook = delivery_for(Some(WebhookConfig {
            url: "http://localhost:9/send".to_string(),
            auth_key: None,
        }))
        .unwrap();
        assert_eq!(webhook.kind(), "webhook");
    }
}

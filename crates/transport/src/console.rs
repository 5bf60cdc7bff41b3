//! Console sender for development

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::{DeliveryReceipt, DeliveryStatus, SmsSender, TransportError};

/// Logs outbound messages instead of hitting a gateway. Every send
/// succeeds with a simulated message id.
#[derive(Debug, Default)]
pub struct ConsoleSmsSender;

impl ConsoleSmsSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SmsSender for ConsoleSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryReceipt, TransportError> {
        if to.is_empty() {
            return Err(TransportError::InvalidRecipient("empty number".to_string()));
        }
        info!(to = %to, body = %body, "Outbound SMS (console)");
        Ok(DeliveryReceipt {
            message_id: format!("SIM-{}", Uuid::new_v4()),
            status: DeliveryStatus::Delivered,
        })
    }
}

//! SMS delivery transport
//!
//! The agent hands finished replies to an [`SmsSender`]. The console sender
//! stands in for a real gateway during development; a provider-backed sender
//! implements the same trait.

pub mod console;

pub use console::ConsoleSmsSender;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// Receipt for one delivered message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Provider message id
    pub message_id: String,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Delivered,
    Queued,
    Failed,
}

/// Outbound SMS delivery
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryReceipt, TransportError>;
}

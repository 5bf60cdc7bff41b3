//! Persistence layer for the SMS agent
//!
//! Stores per-customer conversation history, profile, and the persisted
//! conversation stage behind the [`MessageStore`] trait. The in-memory
//! implementation backs development and tests; a database-backed store
//! plugs in behind the same trait.

pub mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use sms_agent_core::{Appointment, ConversationStage, ConversationTurn, CustomerProfile, Direction, UpdateFields};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Customer not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Canonical phone key: digits only. Empty input stays empty.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Store for conversation history, customer profiles, and stage
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Most recent turns, oldest first. `limit` of None returns everything.
    async fn history(
        &self,
        phone: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ConversationTurn>, StoreError>;

    /// Customer profile, if one exists
    async fn profile(&self, phone: &str) -> Result<Option<CustomerProfile>, StoreError>;

    /// Create or replace the profile
    async fn save_profile(&self, profile: CustomerProfile) -> Result<(), StoreError>;

    /// Append one turn to the history
    async fn save_turn(
        &self,
        phone: &str,
        direction: Direction,
        content: &str,
    ) -> Result<(), StoreError>;

    /// Patch profile fields, creating the profile if absent
    async fn update_profile(&self, phone: &str, updates: &UpdateFields) -> Result<(), StoreError>;

    /// Attach an appointment to the profile
    async fn set_appointment(&self, phone: &str, appointment: Appointment)
        -> Result<(), StoreError>;

    /// Persist the conversation stage
    async fn save_stage(&self, phone: &str, stage: ConversationStage) -> Result<(), StoreError>;

    /// Load the persisted conversation stage
    async fn load_stage(&self, phone: &str) -> Result<Option<ConversationStage>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+1 (514) 555-0000"), "15145550000");
        assert_eq!(normalize_phone("514.555.0000"), "5145550000");
        assert_eq!(normalize_phone(""), "");
    }
}

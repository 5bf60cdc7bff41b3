//! In-memory store for development and tests

use async_trait::async_trait;
use dashmap::DashMap;

use sms_agent_core::{
    Appointment, ConversationStage, ConversationTurn, CustomerProfile, Direction, UpdateFields,
};

use crate::{normalize_phone, MessageStore, StoreError};

#[derive(Debug, Default)]
struct CustomerRecord {
    turns: Vec<ConversationTurn>,
    profile: Option<CustomerProfile>,
    stage: Option<ConversationStage>,
}

/// DashMap-backed store keyed by normalized phone number
#[derive(Default)]
pub struct InMemoryStore {
    records: DashMap<String, CustomerRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a lead before the first contact goes out
    pub fn seed_profile(&self, profile: CustomerProfile) {
        let key = normalize_phone(&profile.phone);
        self.records.entry(key).or_default().profile = Some(profile);
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn history(
        &self,
        phone: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ConversationTurn>, StoreError> {
        let key = normalize_phone(phone);
        let turns = self
            .records
            .get(&key)
            .map(|r| r.turns.clone())
            .unwrap_or_default();
        match limit {
            Some(n) if turns.len() > n => Ok(turns[turns.len() - n..].to_vec()),
            _ => Ok(turns),
        }
    }

    async fn profile(&self, phone: &str) -> Result<Option<CustomerProfile>, StoreError> {
        let key = normalize_phone(phone);
        Ok(self.records.get(&key).and_then(|r| r.profile.clone()))
    }

    async fn save_profile(&self, profile: CustomerProfile) -> Result<(), StoreError> {
        let key = normalize_phone(&profile.phone);
        self.records.entry(key).or_default().profile = Some(profile);
        Ok(())
    }

    async fn save_turn(
        &self,
        phone: &str,
        direction: Direction,
        content: &str,
    ) -> Result<(), StoreError> {
        let key = normalize_phone(phone);
        self.records
            .entry(key)
            .or_default()
            .turns
            .push(ConversationTurn::new(direction, content));
        Ok(())
    }

    async fn update_profile(&self, phone: &str, updates: &UpdateFields) -> Result<(), StoreError> {
        let key = normalize_phone(phone);
        let mut record = self.records.entry(key.clone()).or_default();
        let profile = record
            .profile
            .get_or_insert_with(|| CustomerProfile::new(key));
        profile.apply(updates);
        Ok(())
    }

    async fn set_appointment(
        &self,
        phone: &str,
        appointment: Appointment,
    ) -> Result<(), StoreError> {
        let key = normalize_phone(phone);
        let mut record = self.records.entry(key.clone()).or_default();
        let profile = record
            .profile
            .get_or_insert_with(|| CustomerProfile::new(key));
        profile.appointment = Some(appointment);
        Ok(())
    }

    async fn save_stage(&self, phone: &str, stage: ConversationStage) -> Result<(), StoreError> {
        let key = normalize_phone(phone);
        self.records.entry(key).or_default().stage = Some(stage);
        Ok(())
    }

    async fn load_stage(&self, phone: &str) -> Result<Option<ConversationStage>, StoreError> {
        let key = normalize_phone(phone);
        Ok(self.records.get(&key).and_then(|r| r.stage))
    }
}

//! Conversation types: turns, direction, and the sales-funnel stage machine

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Error;

/// Direction of an SMS turn relative to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Message from the customer
    Inbound,
    /// Message from the store
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the conversation. Immutable once persisted;
/// timestamp ordering is the canonical sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub direction: Direction,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(direction: Direction, content: impl Into<String>) -> Self {
        Self {
            direction,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an inbound (customer) turn
    pub fn inbound(content: impl Into<String>) -> Self {
        Self::new(Direction::Inbound, content)
    }

    /// Create an outbound (store) turn
    pub fn outbound(content: impl Into<String>) -> Self {
        Self::new(Direction::Outbound, content)
    }
}

/// Conversation stage in the repair-sales funnel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationStage {
    /// First outbound contact, details not yet confirmed
    #[default]
    InitialGreeting,
    /// Waiting for the customer to confirm name/model/issue
    AwaitingConfirmation,
    /// Quote presented, waiting for acceptance
    ProvidingQuote,
    /// Negotiating an appointment slot
    SchedulingAppointment,
    /// Appointment proposed, waiting for a yes/no
    AppointmentConfirmation,
    /// Conversation finished
    Completed,
    /// Details in dispute or flow derailed
    ErrorCorrection,
}

/// Static transition map. Only these directed edges are legal; staying in
/// place ("no state change determined") is always allowed.
static STAGE_TRANSITIONS: Lazy<HashMap<ConversationStage, &'static [ConversationStage]>> =
    Lazy::new(|| {
        use ConversationStage::*;
        let mut map = HashMap::new();
        map.insert(InitialGreeting, &[AwaitingConfirmation] as &[_]);
        map.insert(
            AwaitingConfirmation,
            &[ProvidingQuote, ErrorCorrection] as &[_],
        );
        map.insert(
            ProvidingQuote,
            &[SchedulingAppointment, ErrorCorrection] as &[_],
        );
        map.insert(
            SchedulingAppointment,
            &[AppointmentConfirmation, ErrorCorrection] as &[_],
        );
        map.insert(
            AppointmentConfirmation,
            &[Completed, ErrorCorrection] as &[_],
        );
        map.insert(Completed, &[] as &[_]);
        map.insert(
            ErrorCorrection,
            &[AwaitingConfirmation, ProvidingQuote, SchedulingAppointment] as &[_],
        );
        map
    });

impl ConversationStage {
    /// Get allowed transitions from this stage
    pub fn allowed_transitions(&self) -> &'static [ConversationStage] {
        STAGE_TRANSITIONS.get(self).copied().unwrap_or(&[])
    }

    /// Check if a transition to the target stage is allowed.
    /// Remaining in the current stage is always valid.
    pub fn can_transition_to(&self, target: ConversationStage) -> bool {
        target == *self || self.allowed_transitions().contains(&target)
    }

    /// Wire name used for the persisted stage field
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStage::InitialGreeting => "INITIAL_GREETING",
            ConversationStage::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            ConversationStage::ProvidingQuote => "PROVIDING_QUOTE",
            ConversationStage::SchedulingAppointment => "SCHEDULING_APPOINTMENT",
            ConversationStage::AppointmentConfirmation => "APPOINTMENT_CONFIRMATION",
            ConversationStage::Completed => "COMPLETED",
            ConversationStage::ErrorCorrection => "ERROR_CORRECTION",
        }
    }

    /// Parse from the persisted wire name
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "INITIAL_GREETING" => Ok(ConversationStage::InitialGreeting),
            "AWAITING_CONFIRMATION" => Ok(ConversationStage::AwaitingConfirmation),
            "PROVIDING_QUOTE" => Ok(ConversationStage::ProvidingQuote),
            "SCHEDULING_APPOINTMENT" => Ok(ConversationStage::SchedulingAppointment),
            "APPOINTMENT_CONFIRMATION" => Ok(ConversationStage::AppointmentConfirmation),
            "COMPLETED" => Ok(ConversationStage::Completed),
            "ERROR_CORRECTION" => Ok(ConversationStage::ErrorCorrection),
            other => Err(Error::UnknownStage(other.to_string())),
        }
    }
}

impl std::fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_transitions() {
        let stage = ConversationStage::AwaitingConfirmation;
        assert!(stage.can_transition_to(ConversationStage::ProvidingQuote));
        assert!(stage.can_transition_to(ConversationStage::ErrorCorrection));
        assert!(!stage.can_transition_to(ConversationStage::Completed));
    }

    #[test]
    fn test_self_transition_always_allowed() {
        for stage in [
            ConversationStage::InitialGreeting,
            ConversationStage::Completed,
            ConversationStage::ErrorCorrection,
        ] {
            assert!(stage.can_transition_to(stage));
        }
    }

    #[test]
    fn test_completed_is_terminal() {
        let stage = ConversationStage::Completed;
        assert!(stage.allowed_transitions().is_empty());
        assert!(!stage.can_transition_to(ConversationStage::InitialGreeting));
    }

    #[test]
    fn test_error_correction_recovery_paths() {
        let stage = ConversationStage::ErrorCorrection;
        assert!(stage.can_transition_to(ConversationStage::AwaitingConfirmation));
        assert!(stage.can_transition_to(ConversationStage::ProvidingQuote));
        assert!(stage.can_transition_to(ConversationStage::SchedulingAppointment));
        assert!(!stage.can_transition_to(ConversationStage::Completed));
    }

    #[test]
    fn test_every_off_graph_edge_rejected() {
        use ConversationStage::*;
        let all = [
            InitialGreeting,
            AwaitingConfirmation,
            ProvidingQuote,
            SchedulingAppointment,
            AppointmentConfirmation,
            Completed,
            ErrorCorrection,
        ];
        for from in all {
            for to in all {
                let declared = to == from || from.allowed_transitions().contains(&to);
                assert_eq!(from.can_transition_to(to), declared);
            }
        }
    }

    #[test]
    fn test_stage_wire_round_trip() {
        let stage = ConversationStage::SchedulingAppointment;
        assert_eq!(
            ConversationStage::parse(stage.as_str()).unwrap(),
            stage
        );
        assert!(ConversationStage::parse("NOT_A_STAGE").is_err());

        let json = serde_json::to_string(&stage).unwrap();
        assert_eq!(json, "\"SCHEDULING_APPOINTMENT\"");
    }

    #[test]
    fn test_turn_creation() {
        let turn = ConversationTurn::inbound("yes that's correct");
        assert_eq!(turn.direction, Direction::Inbound);
        assert_eq!(turn.content, "yes that's correct");
    }
}

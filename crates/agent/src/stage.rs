//! Stage classification and transition validation
//!
//! Classification is pure pattern matching over the lower-cased latest
//! message; given identical (message, history, stage) inputs it always
//! yields the same candidate. The model never decides the stage.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use sms_agent_core::{ConversationStage, ConversationTurn};

use crate::AgentError;

/// Message categories, checked in this priority order. The first match
/// that has a rule for the current stage wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Affirmative,
    Negative,
    Scheduling,
    Pricing,
    Correction,
}

static AFFIRMATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(yes|yeah|yep|yup|sure|correct|right|absolutely|sounds good|okay|ok|confirm|confirmed|perfect|that works|great)\b",
    )
    .unwrap()
});

static NEGATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(no|nope|wrong|incorrect|not interested|cancel|stop|never mind)\b").unwrap()
});

static SCHEDULING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(schedule|book|appointment|come in|drop off|bring it|monday|tuesday|wednesday|thursday|friday|saturday|sunday|tomorrow|today|tonight|morning|afternoon|evening|weekend)\b",
    )
    .unwrap()
});

static PRICING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(price|cost|how much|quote|charge|fee|expensive|cheaper)\b").unwrap());

static CORRECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(actually|mistake|change|update|different|instead|meant)\b").unwrap()
});

/// All matching categories for a lower-cased message, in priority order
fn matching_categories(message: &str) -> Vec<MessageCategory> {
    let categories: [(MessageCategory, &Regex); 5] = [
        (MessageCategory::Affirmative, &AFFIRMATIVE_RE),
        (MessageCategory::Negative, &NEGATIVE_RE),
        (MessageCategory::Scheduling, &SCHEDULING_RE),
        (MessageCategory::Pricing, &PRICING_RE),
        (MessageCategory::Correction, &CORRECTION_RE),
    ];
    categories
        .iter()
        .filter(|(_, re)| re.is_match(message))
        .map(|(cat, _)| *cat)
        .collect()
}

/// Stage rule table: the move a category triggers from a stage, if any
fn rule_for(stage: ConversationStage, category: MessageCategory) -> Option<ConversationStage> {
    use ConversationStage::*;
    use MessageCategory::*;

    match (stage, category) {
        (AwaitingConfirmation, Affirmative) => Some(ProvidingQuote),
        (AwaitingConfirmation, Negative | Correction) => Some(ErrorCorrection),

        (ProvidingQuote, Affirmative | Scheduling) => Some(SchedulingAppointment),
        (ProvidingQuote, Negative | Correction) => Some(ErrorCorrection),

        (SchedulingAppointment, Affirmative | Scheduling) => Some(AppointmentConfirmation),
        (SchedulingAppointment, Negative | Correction) => Some(ErrorCorrection),

        (AppointmentConfirmation, Affirmative) => Some(Completed),
        (AppointmentConfirmation, Negative | Correction) => Some(ErrorCorrection),

        // Recovery paths out of the correction stage
        (ErrorCorrection, Affirmative | Correction) => Some(AwaitingConfirmation),
        (ErrorCorrection, Scheduling) => Some(SchedulingAppointment),
        (ErrorCorrection, Pricing) => Some(ProvidingQuote),

        _ => None,
    }
}

/// Recover the working stage for a turn.
///
/// The persisted stage always wins. Without one, an empty history means the
/// conversation has not started (`InitialGreeting`); otherwise the safest
/// recovery point is re-confirming the customer's details.
pub fn resolve_stage(
    stored: Option<ConversationStage>,
    history: &[ConversationTurn],
) -> ConversationStage {
    match stored {
        Some(stage) => stage,
        None if history.is_empty() => ConversationStage::InitialGreeting,
        None => ConversationStage::AwaitingConfirmation,
    }
}

/// Reject any candidate move that is off the transition graph. Staying put
/// is always fine.
pub fn validate_transition(
    from: ConversationStage,
    to: ConversationStage,
) -> Result<(), AgentError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AgentError::IllegalTransition { from, to })
    }
}

/// Deterministic stage classifier
#[derive(Debug, Default, Clone)]
pub struct StageClassifier;

impl StageClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Candidate stage for the latest inbound message.
    ///
    /// An empty history always yields `InitialGreeting` regardless of the
    /// message. Matching categories are scanned in priority order and the
    /// first one with a rule for the current stage decides; a category
    /// that matches but has no rule here never shadows a later one that
    /// does. No applicable rule leaves the stage unchanged.
    pub fn classify(
        &self,
        stage: ConversationStage,
        latest: &str,
        history: &[ConversationTurn],
    ) -> ConversationStage {
        if history.is_empty() {
            return ConversationStage::InitialGreeting;
        }
        // The first reply after the greeting starts the confirmation step
        if stage == ConversationStage::InitialGreeting {
            return ConversationStage::AwaitingConfirmation;
        }

        let candidate = matching_categories(&latest.to_lowercase())
            .into_iter()
            .find_map(|category| rule_for(stage, category))
            .unwrap_or(stage);

        if candidate != stage {
            debug!(from = %stage, to = %candidate, "Stage candidate");
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_agent_core::ConversationTurn;

    fn one_turn() -> Vec<ConversationTurn> {
        vec![ConversationTurn::outbound("Hi John! Is this correct?")]
    }

    #[test]
    fn test_empty_history_forces_initial_greeting() {
        let classifier = StageClassifier::new();
        for stage in [
            ConversationStage::ProvidingQuote,
            ConversationStage::Completed,
        ] {
            assert_eq!(
                classifier.classify(stage, "yes please", &[]),
                ConversationStage::InitialGreeting
            );
        }
    }

    #[test]
    fn test_confirmation_yes_moves_to_quote() {
        let classifier = StageClassifier::new();
        let candidate = classifier.classify(
            ConversationStage::AwaitingConfirmation,
            "yes that's correct",
            &one_turn(),
        );
        assert_eq!(candidate, ConversationStage::ProvidingQuote);
    }

    #[test]
    fn test_wrong_detail_moves_to_error_correction() {
        let classifier = StageClassifier::new();
        let candidate = classifier.classify(
            ConversationStage::ProvidingQuote,
            "actually that's the wrong phone",
            &one_turn(),
        );
        assert_eq!(candidate, ConversationStage::ErrorCorrection);
    }

    #[test]
    fn test_unmatched_message_keeps_stage() {
        let classifier = StageClassifier::new();
        let candidate = classifier.classify(
            ConversationStage::ProvidingQuote,
            "hmm let me think about it",
            &one_turn(),
        );
        assert_eq!(candidate, ConversationStage::ProvidingQuote);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = StageClassifier::new();
        let history = one_turn();
        let first = classifier.classify(
            ConversationStage::SchedulingAppointment,
            "tomorrow afternoon works",
            &history,
        );
        for _ in 0..10 {
            assert_eq!(
                classifier.classify(
                    ConversationStage::SchedulingAppointment,
                    "tomorrow afternoon works",
                    &history,
                ),
                first
            );
        }
        assert_eq!(first, ConversationStage::AppointmentConfirmation);
    }

    #[test]
    fn test_priority_order_affirmative_beats_scheduling() {
        // "yes" and a weekday both appear; affirmative is checked first
        let classifier = StageClassifier::new();
        let candidate = classifier.classify(
            ConversationStage::AppointmentConfirmation,
            "yes friday is fine",
            &one_turn(),
        );
        assert_eq!(candidate, ConversationStage::Completed);
    }

    #[test]
    fn test_inapplicable_category_yields_to_next_match() {
        // "tuesday" matches scheduling first, which has no rule while
        // awaiting confirmation; "change"/"instead" still carry the move
        let classifier = StageClassifier::new();
        let candidate = classifier.classify(
            ConversationStage::AwaitingConfirmation,
            "can we change it to tuesday instead",
            &one_turn(),
        );
        assert_eq!(candidate, ConversationStage::ErrorCorrection);
    }

    #[test]
    fn test_error_correction_recovery_to_quote() {
        let classifier = StageClassifier::new();
        let candidate = classifier.classify(
            ConversationStage::ErrorCorrection,
            "so how much would that cost",
            &one_turn(),
        );
        assert_eq!(candidate, ConversationStage::ProvidingQuote);
    }

    #[test]
    fn test_no_inside_word_does_not_match() {
        // "phone" contains "no" but must not categorize as negative
        let classifier = StageClassifier::new();
        let candidate = classifier.classify(
            ConversationStage::AwaitingConfirmation,
            "phone",
            &one_turn(),
        );
        assert_eq!(candidate, ConversationStage::AwaitingConfirmation);
    }

    #[test]
    fn test_completed_stays_completed() {
        let classifier = StageClassifier::new();
        let candidate = classifier.classify(
            ConversationStage::Completed,
            "yes book it tomorrow",
            &one_turn(),
        );
        assert_eq!(candidate, ConversationStage::Completed);
    }

    #[test]
    fn test_resolve_stage_precedence() {
        assert_eq!(
            resolve_stage(Some(ConversationStage::ProvidingQuote), &[]),
            ConversationStage::ProvidingQuote
        );
        assert_eq!(resolve_stage(None, &[]), ConversationStage::InitialGreeting);
        assert_eq!(
            resolve_stage(None, &one_turn()),
            ConversationStage::AwaitingConfirmation
        );
    }

    #[test]
    fn test_validate_transition_rejects_off_graph() {
        assert!(validate_transition(
            ConversationStage::AwaitingConfirmation,
            ConversationStage::ProvidingQuote
        )
        .is_ok());
        assert!(matches!(
            validate_transition(
                ConversationStage::Completed,
                ConversationStage::ProvidingQuote
            ),
            Err(AgentError::IllegalTransition { .. })
        ));
    }
}

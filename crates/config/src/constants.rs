//! Centralized constants for the SMS agent
//!
//! Single source of truth for the business constants and canned replies
//! used across the crates.

/// SMS sizing limits
pub mod sms {
    /// Hard cap for a single outbound SMS segment
    pub const MAX_LEN: usize = 160;

    /// Soft cap used when rebuilding an over-long reply from sentences,
    /// leaving room for closing punctuation
    pub const SOFT_LEN: usize = 157;
}

/// Prompt sizing
pub mod prompt {
    /// How many prior turns the prompt includes
    pub const HISTORY_WINDOW: usize = 3;
}

/// Canned replies
pub mod replies {
    /// Sent when the pipeline fails outright
    pub const FALLBACK: &str =
        "Sorry, I'm having trouble right now. Please call us at (555) 123-4567 for immediate assistance.";

    /// Used when the model produced nothing usable
    pub const EMPTY_APOLOGY: &str =
        "I apologize, but I'm having trouble processing your request. Please try again.";

    /// Used when the classified stage move is off the transition graph
    pub const CLARIFICATION: &str =
        "Sorry, I want to make sure I have this right. Could you confirm your name, phone model and the issue?";
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Anthropic API endpoint
    pub const ANTHROPIC_DEFAULT: &str = "https://api.anthropic.com";
}

/// Escalation contacts
pub mod escalation {
    /// Phone number the fallback reply directs customers to
    pub const PHONE: &str = "(555) 123-4567";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_replies_fit_one_segment() {
        assert!(replies::FALLBACK.len() <= sms::MAX_LEN);
        assert!(replies::EMPTY_APOLOGY.len() <= sms::MAX_LEN);
        assert!(replies::CLARIFICATION.len() <= sms::MAX_LEN);
    }

    #[test]
    fn test_soft_len_leaves_punctuation_room() {
        assert!(sms::SOFT_LEN < sms::MAX_LEN);
    }
}

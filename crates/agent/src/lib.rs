//! SMS sales agent orchestration
//!
//! Features:
//! - Deterministic stage classification over the sales funnel
//! - Stage-aware prompt composition with the store knowledge base
//! - Conversation analyzer producing one steering instruction per turn
//! - Bounded two-round tool protocol against the Claude backend
//! - SMS sanitization (length, punctuation)

pub mod analyzer;
pub mod composer;
pub mod orchestrator;
pub mod sanitize;
pub mod stage;

pub use analyzer::ConversationAnalyzer;
pub use composer::PromptComposer;
pub use orchestrator::{SmsAgent, TurnOutcome};
pub use sanitize::sanitize;
pub use stage::{resolve_stage, validate_transition, MessageCategory, StageClassifier};

use sms_agent_core::ConversationStage;
use thiserror::Error;

/// Agent errors. Everything here is caught at the orchestrator boundary;
/// nothing propagates past a turn.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Illegal stage transition: {from} -> {to}")]
    IllegalTransition {
        from: ConversationStage,
        to: ConversationStage,
    },

    #[error("Analyzer error: {0}")]
    Analyzer(String),

    #[error("Model call error: {0}")]
    ModelCall(String),

    #[error("Model call timed out")]
    Timeout,

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sms_agent_llm::LlmError> for AgentError {
    fn from(err: sms_agent_llm::LlmError) -> Self {
        match err {
            sms_agent_llm::LlmError::Timeout => AgentError::Timeout,
            other => AgentError::ModelCall(other.to_string()),
        }
    }
}

impl From<sms_agent_persistence::StoreError> for AgentError {
    fn from(err: sms_agent_persistence::StoreError) -> Self {
        AgentError::Storage(err.to_string())
    }
}

impl From<sms_agent_tools::ToolError> for AgentError {
    fn from(err: sms_agent_tools::ToolError) -> Self {
        AgentError::Tool(err.to_string())
    }
}

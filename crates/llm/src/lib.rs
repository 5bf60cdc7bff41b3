//! LLM integration for the SMS agent
//!
//! Features:
//! - Claude backend with native tool_use support
//! - Prompt message types and tool schema builder
//! - The repair-shop tool set exposed to the model

pub mod backend;
pub mod claude;
pub mod prompt;

pub use backend::{LlmBackend, ModelResponse};
pub use claude::{ClaudeBackend, ClaudeConfig};
pub use prompt::{repair_shop_tools, Message, Role, ToolBuilder};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

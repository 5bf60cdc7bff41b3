//! Model backend trait and response types
//!
//! The orchestrator talks to the model only through [`LlmBackend`], so tests
//! can substitute a scripted backend and the HTTP client stays contained in
//! one place.

use async_trait::async_trait;

use sms_agent_core::llm_types::{StopReason, ToolCall, ToolDefinition};

use crate::prompt::Message;
use crate::LlmError;

/// One complete (non-streamed) model response
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    /// Text content from the response
    pub text: String,
    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// Why the model stopped
    pub stop_reason: StopReason,
    /// Input tokens used
    pub input_tokens: usize,
    /// Output tokens generated
    pub output_tokens: usize,
}

impl ModelResponse {
    /// Check if the model requested tool use
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// The first requested tool call. Any further calls in the same
    /// response are ignored by the protocol.
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.tool_calls.first()
    }
}

/// Backend trait for model calls
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Run one model round-trip. `tools` may be empty for plain generation.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        max_tokens: u32,
    ) -> Result<ModelResponse, LlmError>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tool_call_selection() {
        let response = ModelResponse {
            text: String::new(),
            tool_calls: vec![
                ToolCall {
                    id: "a".to_string(),
                    name: "scheduleAppointment".to_string(),
                    input: serde_json::json!({}),
                },
                ToolCall {
                    id: "b".to_string(),
                    name: "stopConvo".to_string(),
                    input: serde_json::json!({}),
                },
            ],
            stop_reason: StopReason::ToolUse,
            input_tokens: 0,
            output_tokens: 0,
        };
        assert!(response.has_tool_calls());
        assert_eq!(response.first_tool_call().map(|c| c.name.as_str()), Some("scheduleAppointment"));
    }
}

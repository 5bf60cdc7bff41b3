//! Core types for the SMS repair-sales agent
//!
//! Shared across all other crates:
//! - Conversation turns and the sales-funnel stage machine
//! - Customer profile and appointment records
//! - Model-call types (tool definitions, tool calls, stop reasons)
//! - Error types

pub mod conversation;
pub mod customer;
pub mod error;
pub mod llm_types;

pub use conversation::{ConversationStage, ConversationTurn, Direction};
pub use customer::{Appointment, AppointmentStatus, CustomerProfile, UpdateFields};
pub use error::{Error, Result};
pub use llm_types::{StopReason, ToolCall, ToolDefinition};

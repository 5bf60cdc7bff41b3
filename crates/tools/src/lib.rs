//! Repair-shop tools invoked by the model
//!
//! The tool surface is a closed set: every tool the model may call is a
//! variant of [`ToolAction`], parsed from the wire name and JSON input, and
//! executed by [`ToolDispatcher`]. A name outside the set never becomes an
//! error path out of the dispatcher; it yields a failed outcome the model
//! sees as its tool result.

pub mod action;
pub mod dispatcher;
pub mod outcome;

pub use action::{
    CallbackRequest, InfoUpdate, ScheduleRequest, StopRequest, ToolAction, Urgency,
    UpdateAppointmentRequest,
};
pub use dispatcher::ToolDispatcher;
pub use outcome::ToolOutcome;

use thiserror::Error;

/// Tool errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input for {tool}: {message}")]
    InvalidInput { tool: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sms_agent_persistence::StoreError> for ToolError {
    fn from(err: sms_agent_persistence::StoreError) -> Self {
        ToolError::Storage(err.to_string())
    }
}

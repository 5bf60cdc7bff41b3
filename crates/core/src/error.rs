//! Core error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown conversation stage: {0}")]
    UnknownStage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

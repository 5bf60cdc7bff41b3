//! Configuration management for the SMS agent
//!
//! Supports loading configuration from:
//! - YAML files
//! - Environment variables (SMS_AGENT_ prefix)
//!
//! Business knowledge (store facts, the price table, objection handling)
//! ships with built-in defaults and can be overridden from config/*.yaml.

// Centralized constants module
pub mod constants;
pub mod objections;
pub mod pricing;
pub mod settings;
pub mod store;
pub mod telemetry;

pub use objections::{ObjectionEntry, ObjectionGuide};
pub use pricing::{PriceEntry, PriceList};
pub use settings::{
    load_settings, LlmSettings, ObservabilitySettings, RuntimeEnvironment, Settings, SmsSettings,
};
pub use store::StoreInfo;
pub use telemetry::init_tracing;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::endpoints;
use crate::ConfigError;

/// Runtime environment enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Model call configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// SMS shaping configuration
    #[serde(default)]
    pub sms: SmsSettings,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

/// Model call configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Anthropic API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Max tokens for the main generation round
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Max tokens for the post-tool follow-up round
    #[serde(default = "default_followup_max_tokens")]
    pub followup_max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-call timeout in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

fn default_endpoint() -> String {
    endpoints::ANTHROPIC_DEFAULT.to_string()
}

fn default_model() -> String {
    "claude-3-sonnet-20240229".to_string()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_followup_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.7
}

fn default_call_timeout_secs() -> u64 {
    30
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            followup_max_tokens: default_followup_max_tokens(),
            temperature: default_temperature(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

/// SMS shaping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsSettings {
    /// Hard cap on outbound reply length
    #[serde(default = "default_max_len")]
    pub max_len: usize,

    /// How many prior turns the prompt includes
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_max_len() -> usize {
    crate::constants::sms::MAX_LEN
}

fn default_history_window() -> usize {
    crate::constants::prompt::HISTORY_WINDOW
}

impl Default for SmsSettings {
    fn default() -> Self {
        Self {
            max_len: default_max_len(),
            history_window: default_history_window(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    /// Log level filter, e.g. "info" or "sms_agent=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON-formatted logs
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.call_timeout_secs".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".to_string(),
                message: "max_tokens must be greater than zero".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: "temperature must be between 0.0 and 1.0".to_string(),
            });
        }
        if self.sms.max_len < 40 || self.sms.max_len > 480 {
            return Err(ConfigError::InvalidValue {
                field: "sms.max_len".to_string(),
                message: "max_len must be between 40 and 480".to_string(),
            });
        }
        if self.sms.history_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sms.history_window".to_string(),
                message: "history_window must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (SMS_AGENT_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("SMS_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.sms.max_len, 160);
        assert_eq!(settings.sms.history_window, 3);
        assert_eq!(settings.llm.max_tokens, 200);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.llm.call_timeout_secs = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.sms.max_len = 10;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.llm.temperature = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_environment_strictness() {
        assert!(!RuntimeEnvironment::Development.is_strict());
        assert!(RuntimeEnvironment::Staging.is_strict());
        assert!(RuntimeEnvironment::Production.is_production());
    }
}

//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::settings::ObservabilitySettings;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured log level is applied
/// to the agent crates.
pub fn init_tracing(config: &ObservabilitySettings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level.clone().into());

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}

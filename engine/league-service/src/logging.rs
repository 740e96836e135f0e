//! Logging and tracing setup

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Initialize tracing from the environment, defaulting to info.
pub fn initialize_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_ansi(true);
    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
    Ok(())
}

/// Initialize tracing from an explicit logging configuration.
pub fn initialize_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::new(&config.level);
    let fmt_layer = match config.format.as_str() {
        "json" => fmt::layer().json().with_target(true).boxed(),
        _ => fmt::layer().with_target(false).with_ansi(true).boxed(),
    };
    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
    Ok(())
}

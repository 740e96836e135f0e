//! Service configuration: defaults, environment overrides, validation.

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub lock: LockConfig,
    pub logging: LoggingConfig,
}

/// Bounds for waiting on a league type that is mid-ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Total time a user operation will wait before reporting a timeout.
    pub wait_timeout_ms: u64,

    /// Sleep between polls of the ingestion flag.
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: 10_000,
            poll_interval_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Load configuration from defaults and environment variables.
pub fn load_config() -> Result<ServiceConfig> {
    let mut config = ServiceConfig::default();
    load_from_env(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn load_from_env(config: &mut ServiceConfig) {
    if let Ok(level) = std::env::var("LEAGUE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(format) = std::env::var("LEAGUE_LOG_FORMAT") {
        config.logging.format = format;
    }
    if let Ok(timeout) = std::env::var("LEAGUE_LOCK_TIMEOUT_MS") {
        config.lock.wait_timeout_ms = timeout.parse().unwrap_or(config.lock.wait_timeout_ms);
    }
    if let Ok(poll) = std::env::var("LEAGUE_LOCK_POLL_MS") {
        config.lock.poll_interval_ms = poll.parse().unwrap_or(config.lock.poll_interval_ms);
    }
}

fn validate_config(config: &ServiceConfig) -> Result<()> {
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => return Err(anyhow::anyhow!("invalid log level: {other}")),
    }
    match config.logging.format.as_str() {
        "json" | "pretty" => {}
        other => return Err(anyhow::anyhow!("invalid log format: {other}")),
    }
    if config.lock.poll_interval_ms == 0 {
        return Err(anyhow::anyhow!("lock poll interval must be non-zero"));
    }
    if config.lock.wait_timeout_ms < config.lock.poll_interval_ms {
        return Err(anyhow::anyhow!(
            "lock wait timeout must be at least one poll interval"
        ));
    }
    Ok(())
}

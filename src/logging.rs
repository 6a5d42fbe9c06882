//! Logging bootstrap for `sticky_wall`.
//!
//! Library code only emits `tracing` events; this module installs the global
//! subscriber that writes them to stderr, as text or JSON lines.
//!
//! # Invariants
//! - Initialization happens at most once per process; later calls are no-ops.
//! - `RUST_LOG`, when set, takes precedence over the configured level.

use anyhow::{Context, anyhow};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

static LOGGING_INIT: OnceCell<&'static str> = OnceCell::new();

/// Logging settings from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace|debug|info|warn|error.
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            json: false,
        }
    }
}

/// `debug` in debug builds, `info` in release builds.
#[must_use]
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error for an unsupported level, or if another global
/// subscriber was installed outside this function.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = normalize_level(&config.level)?;

    LOGGING_INIT
        .get_or_try_init(|| -> anyhow::Result<&'static str> {
            let filter = match EnvFilter::try_from_default_env() {
                Ok(filter) => filter,
                Err(_) => EnvFilter::try_new(level)
                    .with_context(|| format!("invalid log level `{level}`"))?,
            };
            let builder = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr);
            let installed = if config.json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };
            installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;
            tracing::debug!(log_level = level, json = config.json, "logging initialized");
            Ok(level)
        })
        .map(|_| ())
}

/// Level the subscriber was installed with, if any.
#[must_use]
pub fn logging_status() -> Option<&'static str> {
    LOGGING_INIT.get().copied()
}

/// Map a user-supplied level onto the accepted set.
///
/// # Errors
///
/// Returns an error for anything outside trace|debug|info|warn|error.
pub fn normalize_level(level: &str) -> anyhow::Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(anyhow!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

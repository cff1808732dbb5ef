//! Logging setup for hive-adapter.
//!
//! The adapter logs through `tracing`. SQL text, timings and connection state
//! changes go to `debug`, server-side operation logs to `info`, swallowed
//! close failures and skipped catalog tables to `warn`.
//!
//! Hosts that already install a subscriber do not need this module. Others
//! can call [`init_logging`] once; the filter is resolved in this order:
//!
//! 1. `LogConfig::level` (e.g. `"debug"`, or `"off"` to skip setup)
//! 2. `RUST_LOG`
//! 3. `hive_adapter=warn`

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level: "off", "error", "warn", "info", "debug", "trace".
    #[serde(default)]
    pub level: Option<String>,
    /// Log file path. If unset, logs go to stderr.
    #[serde(default)]
    pub file: Option<String>,
}

impl LogConfig {
    /// Build the filter for this configuration.
    fn filter(&self) -> EnvFilter {
        match &self.level {
            Some(level) => EnvFilter::new(format!("hive_adapter={}", level.to_lowercase())),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hive_adapter=warn")),
        }
    }

    fn is_off(&self) -> bool {
        self.level
            .as_deref()
            .map(|level| level.eq_ignore_ascii_case("off"))
            .unwrap_or(false)
    }
}

/// Install the global `tracing` subscriber.
///
/// Runs at most once per process; later calls are no-ops, and a subscriber
/// installed by the host application is left in place.
pub fn init_logging(config: &LogConfig) {
    LOGGING_INITIALIZED.get_or_init(|| {
        if config.is_off() {
            return;
        }

        let filter = config.filter();

        if let Some(ref path) = config.file {
            let file = match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
            {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("hive-adapter: failed to open log file {}: {}", path, e);
                    return;
                }
            };

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(file)
                        .with_target(false)
                        .with_ansi(false)
                        .with_timer(SystemTime),
                )
                .try_init()
                .ok();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_timer(SystemTime),
                )
                .try_init()
                .ok();
        }
    });
}

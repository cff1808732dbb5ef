//! Adapter configuration.
//!
//! Settings that the surrounding tool would otherwise keep in process-wide
//! flags are collected here and passed to the adapter explicitly.

use crate::error::ConnectionError;
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`HiveAdapter`](crate::adapter::HiveAdapter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Worker threads of the calling tool; the pool allows `threads + 2` connections
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Keep the relation cache in sync on drop/rename
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,

    /// Turn unbalanced begin/commit calls into errors instead of warnings
    #[serde(default)]
    pub strict_mode: bool,

    /// Statement polling behaviour
    #[serde(default)]
    pub poll: PollConfig,

    /// Logging setup
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            use_cache: default_use_cache(),
            strict_mode: false,
            poll: PollConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl AdapterConfig {
    /// Parse a configuration fragment.
    pub fn from_json(json: &str) -> Result<Self, ConnectionError> {
        serde_json::from_str(json)
            .map_err(|e| ConnectionError::ParseError(format!("Invalid adapter config: {}", e)))
    }

    /// Maximum number of simultaneously allocated connections.
    pub fn max_connections(&self) -> usize {
        self.threads + 2
    }
}

/// How the executor waits between status polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PollStrategy {
    /// Re-poll immediately
    #[default]
    Busy,
    /// Sleep between polls, doubling from `initial_ms` up to `max_ms`
    Backoff {
        #[serde(default = "default_initial_backoff_ms")]
        initial_ms: u64,
        #[serde(default = "default_max_backoff_ms")]
        max_ms: u64,
    },
}

/// Statement polling configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Wait strategy between polls
    #[serde(default)]
    pub strategy: PollStrategy,

    /// Give up on an operation after this many milliseconds
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl PollConfig {
    /// Replace busy polling with a bounded exponential backoff.
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.strategy = PollStrategy::Backoff {
            initial_ms: initial.as_millis() as u64,
            max_ms: max.as_millis() as u64,
        };
        self
    }

    /// Set the poll deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    /// Deadline as a duration.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Delay before poll number `attempt` (0-based) of an operation.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match self.strategy {
            PollStrategy::Busy => None,
            PollStrategy::Backoff { initial_ms, max_ms } => {
                let factor = 1u64.checked_shl(attempt.min(32)).unwrap_or(u64::MAX);
                let delay = initial_ms.saturating_mul(factor).min(max_ms);
                Some(Duration::from_millis(delay))
            }
        }
    }
}

fn default_threads() -> usize {
    1
}

fn default_use_cache() -> bool {
    true
}

fn default_initial_backoff_ms() -> u64 {
    50
}

fn default_max_backoff_ms() -> u64 {
    1000
}

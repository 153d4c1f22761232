//! Session provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// How the session provider resolves the initial identity
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound for each initial session lookup, in milliseconds
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_ms: u64,

    /// Retry the initial lookup once after a failure or timeout
    #[serde(default = "default_retry_once")]
    pub retry_once: bool,

    /// Capacity of the auth event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl SessionConfig {
    /// Get resolve timeout as Duration
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    /// Sets the resolve timeout.
    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Enables or disables the single retry.
    pub fn with_retry_once(mut self, retry_once: bool) -> Self {
        self.retry_once = retry_once;
        self
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resolve_timeout_ms == 0 || self.resolve_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidResolveTimeout);
        }
        if self.event_buffer == 0 {
            return Err(ValidationError::InvalidEventBuffer);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: default_resolve_timeout(),
            retry_once: default_retry_once(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_resolve_timeout() -> u64 {
    5000
}

fn default_retry_once() -> bool {
    true
}

fn default_event_buffer() -> usize {
    64
}

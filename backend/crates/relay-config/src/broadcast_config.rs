use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Per-recipient send timeout (milliseconds)
pub const MIN_SEND_TIMEOUT_MS: u64 = 10;
pub const MAX_SEND_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 5_000;

// Admin request body size (bytes)
pub const MIN_MAX_BODY_BYTES: usize = 64;
pub const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Fan-out and admin bridge settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// How long a single recipient may block a send before it is evicted
    pub send_timeout_ms: u64,
    /// Largest admin broadcast body accepted
    pub max_body_bytes: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.send_timeout_ms < MIN_SEND_TIMEOUT_MS || self.send_timeout_ms > MAX_SEND_TIMEOUT_MS
        {
            return Err(ConfigError::config(format!(
                "broadcast.send_timeout_ms must be {}-{}, got {}",
                MIN_SEND_TIMEOUT_MS, MAX_SEND_TIMEOUT_MS, self.send_timeout_ms
            )));
        }

        if self.max_body_bytes < MIN_MAX_BODY_BYTES || self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::config(format!(
                "broadcast.max_body_bytes must be {}-{}, got {}",
                MIN_MAX_BODY_BYTES, MAX_MAX_BODY_BYTES, self.max_body_bytes
            )));
        }

        Ok(())
    }
}

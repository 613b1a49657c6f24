use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_REAPER_INTERVAL_SECS: u64 = 1;
pub const MAX_REAPER_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_REAPER_INTERVAL_SECS: u64 = 30;

/// Dead-connection sweep settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaperConfig {
    pub interval_secs: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_REAPER_INTERVAL_SECS,
        }
    }
}

impl ReaperConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.interval_secs < MIN_REAPER_INTERVAL_SECS
            || self.interval_secs > MAX_REAPER_INTERVAL_SECS
        {
            return Err(ConfigError::config(format!(
                "reaper.interval_secs must be {}-{}, got {}",
                MIN_REAPER_INTERVAL_SECS, MAX_REAPER_INTERVAL_SECS, self.interval_secs
            )));
        }

        Ok(())
    }
}

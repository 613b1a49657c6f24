use crate::{ConnectionRateLimiter, RateLimitConfig};

/// Factory for creating per-connection rate limiters
#[derive(Debug, Clone, Default)]
pub struct RateLimiterFactory {
    config: RateLimitConfig,
}

impl RateLimiterFactory {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config }
    }

    pub fn create(&self) -> ConnectionRateLimiter {
        ConnectionRateLimiter::new(self.config.clone())
    }
}

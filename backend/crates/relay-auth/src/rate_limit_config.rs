/// Inbound frame budget for one subscriber connection
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Frames allowed per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 600,
            window_secs: 60,
        }
    }
}

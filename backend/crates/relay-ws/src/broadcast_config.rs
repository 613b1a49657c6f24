use std::time::Duration;

/// Fan-out settings for the broadcast dispatcher
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Longest a single recipient may hold up its own send before eviction
    pub send_timeout: Duration,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(5),
        }
    }
}

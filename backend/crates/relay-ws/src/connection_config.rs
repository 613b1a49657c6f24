use std::time::Duration;

/// Configuration for subscriber connections
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound queue depth (bounded to handle backpressure)
    pub send_buffer_size: usize,
    /// Interval between server pings
    pub heartbeat_interval: Duration,
    /// Close the connection when no pong arrives for this long
    pub heartbeat_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 100,
            heartbeat_interval: Duration::from_secs(30),
            heartbeat_timeout: Duration::from_secs(60),
        }
    }
}

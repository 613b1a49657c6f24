mod auth_config;
mod broadcast_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod rate_limit_config;
mod reaper_config;
mod server_config;
mod websocket_config;

pub use auth_config::AuthConfig;
pub use broadcast_config::BroadcastConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use rate_limit_config::RateLimitConfig;
pub use reaper_config::ReaperConfig;
pub use server_config::ServerConfig;
pub use websocket_config::WebSocketConfig;

#[cfg(test)]
mod tests;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_WS_PORT: u16 = 8787;
const DEFAULT_ADMIN_PORT: u16 = 8766;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

// Connection limits
const MIN_PORT: u16 = 1024;
const MIN_MAX_CONNECTIONS: usize = 1;
const MAX_MAX_CONNECTIONS: usize = 1_000_000;
const DEFAULT_MAX_CONNECTIONS: usize = 10_000;
const DEFAULT_MAX_CONNECTIONS_PER_INSTITUTION: usize = 1_000;

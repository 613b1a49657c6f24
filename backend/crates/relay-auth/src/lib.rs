pub mod admin_token_validator;
pub mod connection_rate_limiter;
pub mod error;
pub mod rate_limit_config;
pub mod rate_limiter_factory;

pub use admin_token_validator::{ADMIN_TOKEN_HEADER, AdminTokenValidator};
pub use connection_rate_limiter::ConnectionRateLimiter;
pub use error::{AuthError, Result};
pub use rate_limit_config::RateLimitConfig;
pub use rate_limiter_factory::RateLimiterFactory;

#[cfg(test)]
mod tests;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing admin token {location}")]
    MissingToken { location: ErrorLocation },

    #[error("Invalid admin token {location}")]
    InvalidToken { location: ErrorLocation },

    #[error("Rate limit exceeded: {limit} frames per {window_secs}s {location}")]
    RateLimitExceeded {
        limit: u32,
        window_secs: u64,
        location: ErrorLocation,
    },
}

impl AuthError {
    /// Stable code for logs and metrics labels
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken { .. } => "MISSING_TOKEN",
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

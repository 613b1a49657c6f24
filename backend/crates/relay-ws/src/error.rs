use crate::InstitutionId;

use relay_auth::AuthError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Evicted after a failed delivery {location}")]
    Evicted { location: ErrorLocation },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error(
        "Institution {institution_id} connection limit exceeded: {current} connections (max: {max}) {location}"
    )]
    InstitutionLimitExceeded {
        institution_id: InstitutionId,
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Invalid institution_id: {message} {location}")]
    InvalidInstitutionId {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON encode failed: {source} {location}")]
    Encode {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Auth error: {source}")]
    Auth {
        #[source]
        source: AuthError,
        location: ErrorLocation,
    },
}

impl WsError {
    /// Stable code for logs and metrics labels
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "CONNECTION_CLOSED",
            Self::Evicted { .. } => "EVICTED",
            Self::HeartbeatTimeout { .. } => "HEARTBEAT_TIMEOUT",
            Self::ConnectionLimitExceeded { .. } => "CONNECTION_LIMIT",
            Self::InstitutionLimitExceeded { .. } => "INSTITUTION_LIMIT",
            Self::InvalidInstitutionId { .. } => "INVALID_INSTITUTION_ID",
            Self::Encode { .. } => "ENCODE_ERROR",
            Self::Auth { source, .. } => source.error_code(),
        }
    }

    /// Whether this error means the relay is full rather than the client misbehaving
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            Self::ConnectionLimitExceeded { .. } | Self::InstitutionLimitExceeded { .. }
        )
    }
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Encode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<AuthError> for WsError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        Self::Auth {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;

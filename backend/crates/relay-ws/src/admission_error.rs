use error_location::ErrorLocation;
use thiserror::Error;

/// Close reason sent when the Origin header is missing or not allow-listed
pub const ORIGIN_NOT_ALLOWED_REASON: &str = "origin not allowed";
/// Close reason sent when the institution_id query parameter is unusable
pub const INVALID_INSTITUTION_REASON: &str = "missing or invalid institution_id";

/// Why a subscriber connection attempt was refused.
/// Both cases close the socket with a policy-violation close code.
#[derive(Error, Debug)]
pub enum AdmissionError {
    #[error("Origin not allowed: {origin:?} {location}")]
    OriginNotAllowed {
        origin: Option<String>,
        location: ErrorLocation,
    },

    #[error("Missing or invalid institution_id: {raw:?} {location}")]
    InvalidInstitutionId {
        raw: Option<String>,
        location: ErrorLocation,
    },
}

impl AdmissionError {
    /// WebSocket close code (1008, policy violation)
    pub fn close_code(&self) -> u16 {
        axum::extract::ws::close_code::POLICY
    }

    /// Human-readable close reason for the client
    pub fn close_reason(&self) -> &'static str {
        match self {
            Self::OriginNotAllowed { .. } => ORIGIN_NOT_ALLOWED_REASON,
            Self::InvalidInstitutionId { .. } => INVALID_INSTITUTION_REASON,
        }
    }

    /// Label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OriginNotAllowed { .. } => "origin",
            Self::InvalidInstitutionId { .. } => "institution_id",
        }
    }
}

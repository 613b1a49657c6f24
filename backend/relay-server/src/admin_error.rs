//! Admin bridge failures and their `{ok: false, error}` responses.

use std::panic::Location;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use http::StatusCode;
use log::debug;
use serde::Serialize;
use thiserror::Error;

/// JSON failure body
#[derive(Debug, Serialize)]
pub struct AdminErrorResponse {
    pub ok: bool,
    pub error: &'static str,
}

/// Admin request rejections with associated HTTP status codes
#[derive(Debug, Error)]
pub enum AdminError {
    /// Missing or wrong shared secret (401)
    #[error("Unauthorized admin request {location}")]
    Unauthorized { location: ErrorLocation },

    /// Body over the configured limit (413)
    #[error("Payload too large: limit {limit} bytes {location}")]
    PayloadTooLarge {
        limit: usize,
        location: ErrorLocation,
    },

    /// Body unreadable or not JSON (400)
    #[error("Invalid JSON: {message} {location}")]
    InvalidJson {
        message: String,
        location: ErrorLocation,
    },

    /// JSON that is not an object (400)
    #[error("Invalid payload: expected a JSON object {location}")]
    InvalidPayload { location: ErrorLocation },

    /// Missing or non-positive-integer institution_id (400)
    #[error("Invalid institution_id {location}")]
    InvalidInstitutionId { location: ErrorLocation },
}

impl AdminError {
    #[track_caller]
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge {
            limit,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_payload() -> Self {
        Self::InvalidPayload {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_institution_id() -> Self {
        Self::InvalidInstitutionId {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidJson { .. }
            | Self::InvalidPayload { .. }
            | Self::InvalidInstitutionId { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Error string returned to the caller
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::PayloadTooLarge { .. } => "payload too large",
            Self::InvalidJson { .. } => "invalid json",
            Self::InvalidPayload { .. } => "invalid payload",
            Self::InvalidInstitutionId { .. } => "invalid institution_id",
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        debug!("{self}");

        let body = AdminErrorResponse {
            ok: false,
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;

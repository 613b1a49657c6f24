use crate::{Result as WsErrorResult, WsError};

use std::fmt;
use std::num::NonZeroU64;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::Serialize;
use serde_json::Value;

/// Field that routes a broadcast message to its institution
pub const INSTITUTION_ID_FIELD: &str = "institution_id";

/// Positive integer identifying an institution (tenant).
///
/// Only constructed through validating functions, so holding one means the
/// value has already passed the boundary checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InstitutionId(NonZeroU64);

impl InstitutionId {
    /// Zero is not a valid institution
    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Parse the raw query-string value of `institution_id`
    #[track_caller]
    pub fn parse(raw: &str) -> WsErrorResult<Self> {
        let trimmed = raw.trim();
        trimmed
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| WsError::InvalidInstitutionId {
                message: format!("expected a positive integer, got {:?}", raw),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Accept only JSON integers greater than zero.
    /// Booleans, floats (even `5.0`), strings and negatives are rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_u64().and_then(Self::new),
            _ => None,
        }
    }

    /// Routing id of a broadcast message; `None` unless the message is an
    /// object with a valid `institution_id` field.
    pub fn from_message(message: &Value) -> Option<Self> {
        message
            .as_object()?
            .get(INSTITUTION_ID_FIELD)
            .and_then(Self::from_value)
    }
}

impl FromStr for InstitutionId {
    type Err = WsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for InstitutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

use crate::{AdmissionError, InstitutionId, OriginAllowList};

use std::panic::Location;

use error_location::ErrorLocation;

/// Query parameter naming the institution a subscriber wants
pub const INSTITUTION_ID_PARAM: &str = "institution_id";

/// Decides, once per connection attempt, whether a subscriber may join.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    allowed_origins: OriginAllowList,
}

impl AdmissionGate {
    pub fn new(allowed_origins: OriginAllowList) -> Self {
        Self { allowed_origins }
    }

    /// Check the origin first, then the institution id. When the query
    /// repeats `institution_id`, the first occurrence is the one used.
    #[track_caller]
    pub fn admit(
        &self,
        origin: Option<&str>,
        query_params: &[(String, String)],
    ) -> Result<InstitutionId, AdmissionError> {
        if !origin.is_some_and(|origin| self.allowed_origins.is_allowed(origin)) {
            return Err(AdmissionError::OriginNotAllowed {
                origin: origin.map(str::to_string),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let raw = query_params
            .iter()
            .find(|(name, _)| name == INSTITUTION_ID_PARAM)
            .map(|(_, value)| value);
        raw.and_then(|value| InstitutionId::parse(value).ok())
            .ok_or_else(|| AdmissionError::InvalidInstitutionId {
                raw: raw.cloned(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

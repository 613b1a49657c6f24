use crate::{AuthError, Result as AuthErrorResult};

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;
use subtle::ConstantTimeEq;

/// Header carrying the admin shared secret
pub const ADMIN_TOKEN_HEADER: &str = "x-ws-token";

/// Validates the shared secret presented by the control plane.
///
/// The comparison is constant-time over the token bytes so response timing
/// does not reveal how much of a guess matched.
pub struct AdminTokenValidator {
    expected: Vec<u8>,
}

impl AdminTokenValidator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            expected: token.into().into_bytes(),
        }
    }

    /// Validate a presented token. Missing and empty tokens never match.
    #[track_caller]
    pub fn validate(&self, presented: Option<&str>) -> AuthErrorResult<()> {
        let presented = match presented {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(AuthError::MissingToken {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let matches: bool = presented.as_bytes().ct_eq(&self.expected).into();
        if matches && !self.expected.is_empty() {
            Ok(())
        } else {
            Err(AuthError::InvalidToken {
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

impl fmt::Debug for AdminTokenValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminTokenValidator")
            .field("expected", &"<redacted>")
            .finish()
    }
}

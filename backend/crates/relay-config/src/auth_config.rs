use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

/// Admin token and subscriber origin policy.
///
/// Both fields are required: the relay refuses to start without a shared
/// secret for the admin bridge or without at least one allowed origin.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret expected in the `X-WS-TOKEN` header
    pub admin_token: Option<String>,
    /// Exact origins allowed to open subscriber connections
    pub allowed_origins: Vec<String>,
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match self.admin_token.as_deref() {
            Some(token) if !token.trim().is_empty() => {}
            _ => {
                return Err(ConfigError::auth(
                    "auth.admin_token (WS_ADMIN_TOKEN or ADMIN_TOKEN) must be set",
                ));
            }
        }

        if self.normalized_origins().is_empty() {
            return Err(ConfigError::auth(
                "auth.allowed_origins (WS_ALLOWED_ORIGINS) must list at least one origin",
            ));
        }

        Ok(())
    }

    /// Replace the origin list from a comma-separated value
    pub fn set_origins_from_csv(&mut self, csv: &str) {
        self.allowed_origins = csv.split(',').map(str::to_string).collect();
    }

    /// Origins trimmed, trailing slashes stripped, empty entries dropped
    pub fn normalized_origins(&self) -> Vec<String> {
        self.allowed_origins
            .iter()
            .map(|origin| origin.trim().trim_end_matches('/'))
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "<redacted>"),
            )
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_ADMIN_PORT, DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_CONNECTIONS_PER_INSTITUTION, DEFAULT_WS_PORT, MAX_MAX_CONNECTIONS,
    MIN_MAX_CONNECTIONS, MIN_PORT,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Port for subscriber WebSocket connections
    pub ws_port: u16,
    /// Port for the admin broadcast and health endpoints
    pub admin_port: u16,
    /// Maximum concurrent subscriber connections
    pub max_connections: usize,
    /// Maximum concurrent subscriber connections for a single institution
    pub max_connections_per_institution: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            ws_port: DEFAULT_WS_PORT,
            admin_port: DEFAULT_ADMIN_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_connections_per_institution: DEFAULT_MAX_CONNECTIONS_PER_INSTITUTION,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::server("server.host must not be empty"));
        }

        // Port 0 means "auto-assign" - OS picks an available port.
        for (name, port) in [("ws_port", self.ws_port), ("admin_port", self.admin_port)] {
            if port != 0 && port < MIN_PORT {
                return Err(ConfigError::server(format!(
                    "server.{} must be 0 (auto) or >= {}, got {}",
                    name, MIN_PORT, port
                )));
            }
        }

        if self.ws_port != 0 && self.ws_port == self.admin_port {
            return Err(ConfigError::server(format!(
                "server.ws_port and server.admin_port must differ, both are {}",
                self.ws_port
            )));
        }

        if self.max_connections < MIN_MAX_CONNECTIONS || self.max_connections > MAX_MAX_CONNECTIONS
        {
            return Err(ConfigError::server(format!(
                "server.max_connections must be {}-{}, got {}",
                MIN_MAX_CONNECTIONS, MAX_MAX_CONNECTIONS, self.max_connections
            )));
        }

        if self.max_connections_per_institution < MIN_MAX_CONNECTIONS
            || self.max_connections_per_institution > self.max_connections
        {
            return Err(ConfigError::server(format!(
                "server.max_connections_per_institution must be {}-{} (max_connections), got {}",
                MIN_MAX_CONNECTIONS, self.max_connections, self.max_connections_per_institution
            )));
        }

        Ok(())
    }

    /// Bind address for the subscriber listener
    pub fn ws_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.ws_port)
    }

    /// Bind address for the admin listener
    pub fn admin_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.admin_port)
    }
}

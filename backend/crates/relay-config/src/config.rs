use crate::{
    AuthConfig, BroadcastConfig, ConfigError, ConfigErrorResult, LoggingConfig, RateLimitConfig,
    ReaperConfig, ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

const CONFIG_DIR_ENV: &str = "WS_CONFIG_DIR";
const CONFIG_DIR_DEFAULT: &str = ".relay";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub broadcast: BroadcastConfig,
    pub reaper: ReaperConfig,
    pub websocket: WebSocketConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Resolve the config directory (WS_CONFIG_DIR, else ./.relay/)
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply WS_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: WS_CONFIG_DIR env var > ./.relay/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_DEFAULT))
    }

    /// Validate all configuration.
    /// Any error here is fatal: the relay must not start half-configured.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.broadcast.validate()?;
        self.reaper.validate()?;
        self.websocket.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }

    /// Log configuration summary (NEVER logs the admin token).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {} (ws {}, admin {}), max {} connections ({} per institution)",
            self.server.host,
            self.server.ws_port,
            self.server.admin_port,
            self.server.max_connections,
            self.server.max_connections_per_institution
        );
        info!(
            "  auth: admin token {}, {} allowed origin(s): {}",
            if self.auth.admin_token.is_some() {
                "set"
            } else {
                "missing"
            },
            self.auth.normalized_origins().len(),
            self.auth.normalized_origins().join(", ")
        );
        info!(
            "  broadcast: send timeout {}ms, max admin body {} bytes",
            self.broadcast.send_timeout_ms, self.broadcast.max_body_bytes
        );
        info!("  reaper: every {}s", self.reaper.interval_secs);
        info!(
            "  websocket: buffer={}, heartbeat={}s/{}s",
            self.websocket.send_buffer_size,
            self.websocket.heartbeat_interval_secs,
            self.websocket.heartbeat_timeout_secs
        );
        info!(
            "  rate_limit: {}/{}s",
            self.rate_limit.max_requests, self.rate_limit.window_secs
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("WS_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("WS_SERVER_PORT", &mut self.server.ws_port);
        Self::apply_env_parse("WS_ADMIN_PORT", &mut self.server.admin_port);
        Self::apply_env_parse("WS_MAX_CONNECTIONS", &mut self.server.max_connections);
        Self::apply_env_parse(
            "WS_MAX_CONNECTIONS_PER_INSTITUTION",
            &mut self.server.max_connections_per_institution,
        );

        // Auth - WS_ADMIN_TOKEN wins, ADMIN_TOKEN is the legacy fallback
        if let Some(token) = ["WS_ADMIN_TOKEN", "ADMIN_TOKEN"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.is_empty())
        {
            self.auth.admin_token = Some(token);
        }
        if let Ok(origins) = std::env::var("WS_ALLOWED_ORIGINS") {
            self.auth.set_origins_from_csv(&origins);
        }

        // Broadcast
        Self::apply_env_parse("WS_SEND_TIMEOUT_MS", &mut self.broadcast.send_timeout_ms);
        Self::apply_env_parse("WS_MAX_ADMIN_BYTES", &mut self.broadcast.max_body_bytes);

        // Reaper
        Self::apply_env_parse("WS_PRUNE_INTERVAL_SECS", &mut self.reaper.interval_secs);

        // WebSocket
        Self::apply_env_parse(
            "WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "WS_HEARTBEAT_INTERVAL_SECS",
            &mut self.websocket.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "WS_HEARTBEAT_TIMEOUT_SECS",
            &mut self.websocket.heartbeat_timeout_secs,
        );

        // Rate limit
        Self::apply_env_parse(
            "WS_RATE_LIMIT_MAX_REQUESTS",
            &mut self.rate_limit.max_requests,
        );
        Self::apply_env_parse(
            "WS_RATE_LIMIT_WINDOW_SECS",
            &mut self.rate_limit.window_secs,
        );

        // Logging
        Self::apply_env_parse("WS_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("WS_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("WS_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values.
    /// Unparseable values are ignored and the previous value is kept.
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.trim().parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}

//! Wires validated configuration into the relay's shared components.

use crate::AdminState;

use relay_auth::{AdminTokenValidator, RateLimitConfig, RateLimiterFactory};
use relay_config::Config;
use relay_ws::{
    AdmissionGate, AppState, BroadcastConfig, BroadcastDispatcher, ConnectionConfig,
    ConnectionLimits, ConnectionRegistry, Metrics, OriginAllowList, Reaper, ShutdownCoordinator,
};

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

/// Everything the two listeners and the background sweep share.
/// One registry instance backs all of them.
pub struct Relay {
    pub app_state: AppState,
    pub admin_state: AdminState,
    pub reaper: Reaper,
}

impl Relay {
    /// Build from a config that has already passed `validate()`
    pub fn build(
        config: &Config,
        shutdown: ShutdownCoordinator,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        let metrics = Metrics::new();

        let registry = ConnectionRegistry::new(ConnectionLimits {
            max_per_institution: config.server.max_connections_per_institution,
            max_total: config.server.max_connections,
        });

        let gate = AdmissionGate::new(OriginAllowList::new(config.auth.normalized_origins()));

        let rate_limiter_factory = RateLimiterFactory::new(RateLimitConfig {
            max_requests: config.rate_limit.max_requests,
            window_secs: config.rate_limit.window_secs,
        });

        let connection_config = ConnectionConfig {
            send_buffer_size: config.websocket.send_buffer_size,
            heartbeat_interval: Duration::from_secs(config.websocket.heartbeat_interval_secs),
            heartbeat_timeout: Duration::from_secs(config.websocket.heartbeat_timeout_secs),
        };

        let dispatcher = BroadcastDispatcher::new(
            registry.clone(),
            BroadcastConfig {
                send_timeout: Duration::from_millis(config.broadcast.send_timeout_ms),
            },
            metrics.clone(),
        );

        // An empty expected token never matches, so an unvalidated config fails closed.
        let validator = AdminTokenValidator::new(config.auth.admin_token.clone().unwrap_or_default());

        let reaper = Reaper::new(
            registry.clone(),
            Duration::from_secs(config.reaper.interval_secs),
            metrics.clone(),
        );

        let app_state = AppState {
            gate: Arc::new(gate),
            rate_limiter_factory,
            registry: registry.clone(),
            metrics: metrics.clone(),
            shutdown: shutdown.clone(),
            config: connection_config,
        };

        let admin_state = AdminState {
            dispatcher,
            registry,
            validator: Arc::new(validator),
            max_body_bytes: config.broadcast.max_body_bytes,
            metrics,
            shutdown,
            prometheus,
        };

        Self {
            app_state,
            admin_state,
            reaper,
        }
    }
}

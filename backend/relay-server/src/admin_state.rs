use relay_auth::AdminTokenValidator;
use relay_ws::{BroadcastDispatcher, ConnectionRegistry, Metrics, ShutdownCoordinator};

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state for the admin listener
#[derive(Clone)]
pub struct AdminState {
    pub dispatcher: BroadcastDispatcher,
    pub registry: ConnectionRegistry,
    pub validator: Arc<AdminTokenValidator>,
    /// Largest accepted broadcast body
    pub max_body_bytes: usize,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    /// None when no Prometheus recorder was installed (tests)
    pub prometheus: Option<PrometheusHandle>,
}

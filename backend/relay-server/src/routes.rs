use crate::{AdminState, admin, health};

use relay_ws::AppState;

use axum::{
    Router,
    routing::{get, post},
};

/// Subscriber listener: WebSocket upgrades only
pub fn build_client_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(relay_ws::handler))
        .route("/ws", get(relay_ws::handler))
        .with_state(state)
}

/// Admin listener: broadcast injection, health and metrics
pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/broadcast", post(admin::broadcast_handler))
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        .with_state(state)
}

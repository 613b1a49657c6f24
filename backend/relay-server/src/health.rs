use crate::AdminState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Health body: registry size at one instant
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub connections: usize,
    pub institutions: usize,
}

/// GET /health - Registry size, no auth
pub async fn health(State(state): State<AdminState>) -> Json<HealthResponse> {
    let stats = state.registry.stats().await;
    Json(HealthResponse {
        ok: true,
        connections: stats.connections,
        institutions: stats.institutions,
    })
}

/// GET /live - Liveness check (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness check; fails once shutdown has begun
pub async fn readiness(State(state): State<AdminState>) -> Response {
    if state.shutdown.is_shutdown() {
        (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response()
    } else {
        (StatusCode::OK, "Ready").into_response()
    }
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<AdminState>) -> Response {
    match state.prometheus {
        Some(ref handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Metrics recorder not installed").into_response(),
    }
}

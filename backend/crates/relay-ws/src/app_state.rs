use crate::{
    AdmissionGate, ConnectionConfig, ConnectionHandle, ConnectionRegistry, EVENTS_TARGET,
    InstitutionId, Metrics, ShutdownCoordinator, WebSocketConnection, create_connection_span,
    web_socket_connection::close_message,
};

use relay_auth::RateLimiterFactory;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ConnectInfo, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::{Extensions, HeaderMap, header},
    response::Response,
};
use log::{debug, warn};
use tokio::sync::mpsc;
use tracing::Instrument;

/// Close reason sent when a registry limit refuses a new subscriber
pub const AT_CAPACITY_REASON: &str = "server at capacity";

/// Shared application state for the subscriber endpoint
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AdmissionGate>,
    pub rate_limiter_factory: RateLimiterFactory,
    pub registry: ConnectionRegistry,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

/// WebSocket upgrade handler.
///
/// Rejected attempts are still upgraded so the client receives a close frame
/// with a readable reason instead of a bare HTTP error.
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
    extensions: Extensions,
    ws: WebSocketUpgrade,
) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    let remote = peer_descriptor(&extensions);

    match state.gate.admit(origin, &params) {
        Ok(institution_id) => {
            debug!("Admitted subscriber from {remote} for institution {institution_id}");
            ws.on_upgrade(move |socket| handle_socket(socket, institution_id, remote, state))
        }
        Err(rejection) => {
            warn!(
                target: EVENTS_TARGET,
                "event=admission_rejected reason={} origin={:?} remote={remote}",
                rejection.kind(),
                origin.unwrap_or("")
            );
            state.metrics.admission_rejected(rejection.kind());

            let frame = close_message(rejection.close_code(), rejection.close_reason());
            ws.on_upgrade(move |socket| close_socket(socket, frame))
        }
    }
}

/// Register an admitted socket and run it until it closes
async fn handle_socket(
    mut socket: WebSocket,
    institution_id: InstitutionId,
    remote: String,
    state: AppState,
) {
    let (tx, rx) = mpsc::channel::<Message>(state.config.send_buffer_size);
    let handle = ConnectionHandle::new(institution_id, remote, tx);

    if let Err(e) = state.registry.add(handle.clone()).await {
        warn!(
            target: EVENTS_TARGET,
            "event=admission_rejected reason=capacity institution_id={institution_id} remote={} error=\"{e}\"",
            handle.remote
        );
        state.metrics.admission_rejected("capacity");
        let _ = socket
            .send(close_message(close_code::AGAIN, AT_CAPACITY_REASON))
            .await;
        return;
    }

    let span = create_connection_span(handle.connection_id, institution_id, &handle.remote);
    let connection_id = handle.connection_id;
    let connection = WebSocketConnection::new(
        handle,
        state.registry.clone(),
        state.config.clone(),
        state.metrics.clone(),
        state.rate_limiter_factory.create(),
    );

    let result = connection
        .handle(socket, rx, state.shutdown.subscribe_guard())
        .instrument(span)
        .await;

    if let Err(e) = result {
        debug!("Connection {connection_id} ended with error: {e}");
    }
}

async fn close_socket(mut socket: WebSocket, frame: Message) {
    let _ = socket.send(frame).await;
}

/// Peer address for diagnostics; "unknown" when the server was not built with
/// connect info.
pub fn peer_descriptor(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

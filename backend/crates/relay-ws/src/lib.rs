pub mod admission_error;
pub mod admission_gate;
pub mod app_state;
pub mod broadcast_config;
pub mod broadcast_dispatcher;
pub mod connection_config;
pub mod connection_handle;
pub mod connection_id;
pub mod connection_limits;
pub mod connection_registry;
pub mod delivery_outcome;
pub mod error;
pub mod institution_id;
pub mod metrics;
pub mod origin_allow_list;
pub mod reaper;
pub mod registry_stats;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use admission_error::AdmissionError;
pub use admission_gate::AdmissionGate;
pub use app_state::{AppState, handler, peer_descriptor};
pub use broadcast_config::BroadcastConfig;
pub use broadcast_dispatcher::BroadcastDispatcher;
pub use connection_config::ConnectionConfig;
pub use connection_handle::ConnectionHandle;
pub use connection_id::ConnectionId;
pub use connection_limits::ConnectionLimits;
pub use connection_registry::ConnectionRegistry;
pub use delivery_outcome::DeliveryOutcome;
pub use error::{Result, WsError};
pub use institution_id::InstitutionId;
pub use metrics::Metrics;
pub use origin_allow_list::OriginAllowList;
pub use reaper::Reaper;
pub use registry_stats::RegistryStats;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::{SLOW_SUBSCRIBER_REASON, WebSocketConnection};

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Log target for relay lifecycle events (`event key=value ...` lines)
pub const EVENTS_TARGET: &str = "relay_events";

/// Create a tracing span for one subscriber connection.
/// All log entries within the connection task will include these fields.
pub fn create_connection_span(
    connection_id: ConnectionId,
    institution_id: InstitutionId,
    remote: &str,
) -> tracing::Span {
    info_span!(
        "ws_connection",
        connection_id = %connection_id,
        institution_id = %institution_id,
        remote = %remote,
    )
}

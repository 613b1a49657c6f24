#![allow(dead_code)]

//! Test infrastructure for relay-server admin tests

use relay_auth::AdminTokenValidator;
use relay_server::{AdminState, build_admin_router};
use relay_ws::{
    BroadcastConfig, BroadcastDispatcher, ConnectionHandle, ConnectionLimits, ConnectionRegistry,
    InstitutionId, Metrics, ShutdownCoordinator,
};

use std::sync::Arc;

use axum::extract::ws::Message;
use axum_test::TestServer;
use tokio::sync::mpsc;

pub const TEST_TOKEN: &str = "test-admin-token";
pub const TEST_MAX_BODY_BYTES: usize = 256;

/// Create AdminState for testing
pub fn create_test_admin_state() -> AdminState {
    let registry = ConnectionRegistry::new(ConnectionLimits::default());
    let metrics = Metrics::new();

    AdminState {
        dispatcher: BroadcastDispatcher::new(
            registry.clone(),
            BroadcastConfig::default(),
            metrics.clone(),
        ),
        registry,
        validator: Arc::new(AdminTokenValidator::new(TEST_TOKEN)),
        max_body_bytes: TEST_MAX_BODY_BYTES,
        metrics,
        shutdown: ShutdownCoordinator::new(),
        prometheus: None,
    }
}

/// Admin router behind a TestServer, plus its state
pub fn create_test_server() -> (TestServer, AdminState) {
    let state = create_test_admin_state();
    let server =
        TestServer::new(build_admin_router(state.clone())).expect("Failed to create test server");
    (server, state)
}

/// Register a subscriber without a socket; frames land in the returned receiver
pub async fn add_subscriber(state: &AdminState, institution_id: u64) -> mpsc::Receiver<Message> {
    let (tx, rx) = mpsc::channel(8);
    let institution = InstitutionId::new(institution_id).expect("non-zero institution");
    state
        .registry
        .add(ConnectionHandle::new(institution, "test-subscriber", tx))
        .await
        .expect("Failed to register subscriber");
    rx
}

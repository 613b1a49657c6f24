#![allow(dead_code)]

use relay_auth::{RateLimitConfig, RateLimiterFactory};
use relay_ws::{
    AdmissionGate, AppState, BroadcastConfig, BroadcastDispatcher, ConnectionConfig,
    ConnectionLimits, ConnectionRegistry, Metrics, OriginAllowList, ShutdownCoordinator,
};

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;

/// Origin every test client presents unless a test overrides it
pub const TEST_ORIGIN: &str = "https://app.example.com";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub allowed_origins: Vec<String>,
    pub max_connections_total: usize,
    pub max_connections_per_institution: usize,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub send_buffer_size: usize,
    pub send_timeout: Duration,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![TEST_ORIGIN.to_string(), "http://localhost:3000".to_string()],
            max_connections_total: 100,
            max_connections_per_institution: 100,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 60,
            send_buffer_size: ConnectionConfig::default().send_buffer_size,
            send_timeout: BroadcastConfig::default().send_timeout,
        }
    }
}

impl TestServerConfig {
    /// Create config with strict connection limits (for capacity tests)
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections_total: 2,
            ..Default::default()
        }
    }

    /// Create config with strict rate limits (for flood tests)
    pub fn with_strict_rate_limits() -> Self {
        Self {
            rate_limit_max_requests: 3,
            rate_limit_window_secs: 60,
            ..Default::default()
        }
    }

    /// Create config where a subscriber that stops reading is evicted quickly
    pub fn with_tight_delivery() -> Self {
        Self {
            send_buffer_size: 1,
            send_timeout: Duration::from_millis(100),
            ..Default::default()
        }
    }
}

/// Test server with access to AppState and a dispatcher sharing its registry
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
    pub dispatcher: BroadcastDispatcher,
}

impl TestServerWithState {
    /// Wait until the registry holds exactly `expected` connections
    pub async fn wait_for_connections(&self, expected: usize) {
        let registry = &self.app_state.registry;
        let reached = tokio::time::timeout(Duration::from_secs(2), async {
            while registry.total_connections().await != expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(
            reached.is_ok(),
            "expected {expected} connections, found {}",
            registry.total_connections().await
        );
    }
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let broadcast_config = BroadcastConfig {
        send_timeout: config.send_timeout,
    };
    let (app, app_state) = create_app(config);
    let dispatcher = BroadcastDispatcher::new(
        app_state.registry.clone(),
        broadcast_config,
        app_state.metrics.clone(),
    );
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState {
        server,
        app_state,
        dispatcher,
    }
}

fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let rate_limiter_factory = RateLimiterFactory::new(RateLimitConfig {
        max_requests: config.rate_limit_max_requests,
        window_secs: config.rate_limit_window_secs,
    });

    let registry = ConnectionRegistry::new(ConnectionLimits {
        max_per_institution: config.max_connections_per_institution,
        max_total: config.max_connections_total,
    });

    let app_state = AppState {
        gate: Arc::new(AdmissionGate::new(OriginAllowList::new(
            &config.allowed_origins,
        ))),
        rate_limiter_factory,
        registry,
        metrics: Metrics::default(),
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig {
            send_buffer_size: config.send_buffer_size,
            ..ConnectionConfig::default()
        },
    };

    let router = Router::new()
        .route("/ws", get(relay_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}

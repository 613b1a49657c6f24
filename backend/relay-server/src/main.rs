use relay_server::{Relay, ServerError, build_admin_router, build_client_router, logger};

use relay_ws::ShutdownCoordinator;

use std::error::Error;
use std::future::IntoFuture;
use std::net::SocketAddr;

use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional; real deployments set the environment directly
    dotenvy::dotenv().ok();

    // Load and validate configuration. Missing token or origins stop here.
    let config = relay_config::Config::load()?;
    config.validate()?;

    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let log_dir = relay_config::Config::config_dir()?.join(&config.logging.dir);
        std::fs::create_dir_all(&log_dir)?;
        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting relay-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::metrics(e.to_string()))?;

    let shutdown = ShutdownCoordinator::new();
    let relay = Relay::build(&config, shutdown.clone(), Some(prometheus));

    let reaper_task = relay.reaper.spawn(&shutdown);
    info!("Reaper running every {}s", config.reaper.interval_secs);

    let ws_listener = TcpListener::bind(config.server.ws_bind_addr()).await?;
    let admin_listener = TcpListener::bind(config.server.admin_bind_addr()).await?;
    info!("Subscriber endpoint listening on {}", ws_listener.local_addr()?);
    info!("Admin endpoint listening on {}", admin_listener.local_addr()?);

    spawn_signal_handler(shutdown.clone());

    let client_server = axum::serve(
        ws_listener,
        build_client_router(relay.app_state)
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown(shutdown.clone()))
    .into_future();

    let admin_server = axum::serve(
        admin_listener,
        build_admin_router(relay.admin_state)
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown(shutdown.clone()))
    .into_future();

    info!("Relay ready to accept connections");
    let served = tokio::try_join!(client_server, admin_server);

    // Either listener failing takes the whole relay down
    shutdown.shutdown();
    if let Err(e) = reaper_task.await {
        error!("Reaper task failed: {e}");
    }
    served?;

    info!("Graceful shutdown complete");
    Ok(())
}

async fn wait_for_shutdown(shutdown: ShutdownCoordinator) {
    shutdown.subscribe_guard().wait().await;
}

/// Trigger shutdown on SIGINT, or SIGTERM on unix
fn spawn_signal_handler(shutdown: ShutdownCoordinator) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for SIGINT: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    error!("Failed to listen for SIGTERM: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
            _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
        }
        shutdown.shutdown();
    });
}

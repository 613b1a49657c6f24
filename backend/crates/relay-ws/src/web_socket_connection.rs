use crate::{
    ConnectionConfig, ConnectionHandle, ConnectionRegistry, EVENTS_TARGET, Metrics,
    Result as WsErrorResult, ShutdownGuard, WsError,
};

use relay_auth::ConnectionRateLimiter;

use std::panic::Location;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

/// How long teardown waits for the writer to flush a final close frame
const WRITER_GRACE: Duration = Duration::from_secs(1);

/// Close reason sent to a subscriber evicted for not keeping up
pub const SLOW_SUBSCRIBER_REASON: &str = "subscriber too slow";

/// Manages a single subscriber connection.
///
/// Subscribers are receive-only: inbound data frames are rate-limited and
/// discarded. Outbound frames arrive through the bounded queue whose sending
/// half lives in the registry.
pub struct WebSocketConnection {
    handle: ConnectionHandle,
    registry: ConnectionRegistry,
    config: ConnectionConfig,
    metrics: Metrics,
    rate_limiter: ConnectionRateLimiter,
}

impl WebSocketConnection {
    pub fn new(
        handle: ConnectionHandle,
        registry: ConnectionRegistry,
        config: ConnectionConfig,
        metrics: Metrics,
        rate_limiter: ConnectionRateLimiter,
    ) -> Self {
        Self {
            handle,
            registry,
            config,
            metrics,
            rate_limiter,
        }
    }

    /// Handle the connection lifecycle. The handle must already be registered;
    /// it is always unregistered before this returns.
    pub async fn handle(
        self,
        socket: WebSocket,
        mut outbound_rx: mpsc::Receiver<Message>,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        let Self {
            handle,
            registry,
            config,
            metrics,
            rate_limiter,
        } = self;
        let institution_id = handle.institution_id;
        let connection_id = handle.connection_id;

        info!(
            target: EVENTS_TARGET,
            "event=connected institution_id={institution_id} connection_id={connection_id} remote={}",
            handle.remote
        );
        metrics.connection_established();

        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Dropping the receiver when this task ends is what marks the handle closed.
        let mut close_signal = handle.close_signal();
        let mut send_task = tokio::spawn(async move {
            let mut watching = true;
            loop {
                tokio::select! {
                    biased;

                    requested = async { close_signal.wait_for(|requested| *requested).await.is_ok() }, if watching => {
                        if requested {
                            // Queued frames are abandoned; the close goes out next.
                            let _ = ws_sender
                                .send(close_message(close_code::POLICY, SLOW_SUBSCRIBER_REASON))
                                .await;
                            break;
                        }
                        // Every handle is gone; keep draining what is already queued.
                        watching = false;
                    }

                    frame = outbound_rx.recv() => {
                        let Some(frame) = frame else {
                            break;
                        };
                        let is_close = matches!(frame, Message::Close(_));
                        if ws_sender.send(frame).await.is_err() || is_close {
                            break;
                        }
                    }
                }
            }
        });
        let mut writer_done = false;

        let mut heartbeat = tokio::time::interval(config.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        heartbeat.tick().await;
        let mut last_pong = Instant::now();

        let result = loop {
            tokio::select! {
                frame = ws_receiver.next() => {
                    match frame {
                        Some(Ok(Message::Pong(_))) => {
                            last_pong = Instant::now();
                        }
                        Some(Ok(Message::Ping(_))) => {}
                        Some(Ok(Message::Close(_))) | None => {
                            debug!("Connection {connection_id} closed by client");
                            break Ok(());
                        }
                        Some(Ok(_)) => {
                            if let Err(e) = rate_limiter.check() {
                                warn!("Rate limit exceeded for connection {connection_id}");
                                handle.try_send(close_message(
                                    close_code::POLICY,
                                    "rate limit exceeded",
                                ));
                                break Err(WsError::from(e));
                            }
                            metrics.frame_discarded();
                        }
                        Some(Err(e)) => {
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {e}"),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                    }
                }

                _ = &mut send_task => {
                    writer_done = true;
                    if handle.is_close_requested() {
                        break Err(WsError::Evicted {
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    break Err(WsError::ConnectionClosed {
                        reason: "outbound writer stopped".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }

                _ = heartbeat.tick() => {
                    if last_pong.elapsed() > config.heartbeat_timeout {
                        break Err(WsError::HeartbeatTimeout {
                            timeout_secs: config.heartbeat_timeout.as_secs(),
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    handle.try_send(Message::Ping(Bytes::new()));
                }

                _ = shutdown_guard.wait() => {
                    debug!("Shutting down connection {connection_id} gracefully");
                    handle.try_send(close_message(close_code::AWAY, "server shutting down"));
                    break Ok(());
                }
            }
        };

        registry.remove(institution_id, connection_id).await;
        let session = handle.session_duration();
        drop(handle);

        if !writer_done && tokio::time::timeout(WRITER_GRACE, &mut send_task).await.is_err() {
            send_task.abort();
        }

        let reason = match &result {
            Ok(()) => "normal",
            Err(e) => e.error_code(),
        };
        metrics.connection_closed(reason, session);
        info!(
            target: EVENTS_TARGET,
            "event=disconnected institution_id={institution_id} connection_id={connection_id} reason={reason} duration_ms={}",
            session.as_millis()
        );

        result
    }
}

/// Build a close frame with a static reason
pub(crate) fn close_message(code: u16, reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: Utf8Bytes::from_static(reason),
    }))
}

use crate::{ConnectionId, DeliveryOutcome, InstitutionId};

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::sync::watch;

/// Registry-side view of a live subscriber connection.
///
/// The socket itself belongs to the connection task; this handle only holds
/// the sending half of that task's outbound queue, so cloning it never keeps
/// the transport open.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub connection_id: ConnectionId,
    pub institution_id: InstitutionId,
    /// Peer address, diagnostic only
    pub remote: String,
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<Message>,
    close_requested: Arc<watch::Sender<bool>>,
}

impl ConnectionHandle {
    pub fn new(
        institution_id: InstitutionId,
        remote: impl Into<String>,
        sender: mpsc::Sender<Message>,
    ) -> Self {
        let (close_requested, _) = watch::channel(false);
        Self {
            connection_id: ConnectionId::new(),
            institution_id,
            remote: remote.into(),
            connected_at: Utc::now(),
            sender,
            close_requested: Arc::new(close_requested),
        }
    }

    /// True once the writer side has stopped draining the queue
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Queue a frame, waiting at most `timeout` for space
    pub async fn deliver(&self, frame: Message, timeout: Duration) -> DeliveryOutcome {
        match self.sender.send_timeout(frame, timeout).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(SendTimeoutError::Closed(_)) => DeliveryOutcome::Closed,
            Err(SendTimeoutError::Timeout(_)) => DeliveryOutcome::TimedOut,
        }
    }

    /// Queue a control frame without waiting; dropped if the queue is full
    pub fn try_send(&self, frame: Message) -> bool {
        self.sender.try_send(frame).is_ok()
    }

    /// Ask the connection task to close the transport. Skips the outbound
    /// queue, which may be full when this is needed.
    pub fn request_close(&self) {
        self.close_requested.send_replace(true);
    }

    pub fn is_close_requested(&self) -> bool {
        *self.close_requested.borrow()
    }

    /// Receiver that observes `request_close`
    pub(crate) fn close_signal(&self) -> watch::Receiver<bool> {
        self.close_requested.subscribe()
    }

    /// Time since the subscriber was admitted
    pub fn session_duration(&self) -> Duration {
        (Utc::now() - self.connected_at).to_std().unwrap_or_default()
    }
}

use crate::{
    BroadcastConfig, ConnectionHandle, ConnectionRegistry, DeliveryOutcome, EVENTS_TARGET,
    InstitutionId, Metrics, WsError,
};

use axum::extract::ws::{Message, Utf8Bytes};
use futures::future::join_all;
use log::{debug, error, warn};
use serde_json::Value;

/// Fans one institution-addressed message out to that institution's subscribers.
///
/// Delivery is best-effort and at-most-once: a subscriber that is not
/// connected when the message arrives never sees it.
#[derive(Clone)]
pub struct BroadcastDispatcher {
    registry: ConnectionRegistry,
    config: BroadcastConfig,
    metrics: Metrics,
}

impl BroadcastDispatcher {
    pub fn new(registry: ConnectionRegistry, config: BroadcastConfig, metrics: Metrics) -> Self {
        Self {
            registry,
            config,
            metrics,
        }
    }

    /// Deliver `message` verbatim to every current subscriber of its
    /// `institution_id`. Returns how many sends completed.
    ///
    /// Each recipient is sent to concurrently; a failed recipient is evicted
    /// from the registry and never affects its siblings.
    pub async fn broadcast(&self, message: &Value) -> usize {
        let Some(institution_id) = InstitutionId::from_message(message) else {
            return 0;
        };

        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(e) => {
                let err = WsError::from(e);
                error!(
                    target: EVENTS_TARGET,
                    "event=encode_error institution_id={institution_id} error=\"{err}\""
                );
                self.metrics.error_occurred("encode");
                return 0;
            }
        };

        let recipients = self.registry.snapshot(institution_id).await;
        if recipients.is_empty() {
            debug!("No subscribers for institution {institution_id}");
            return 0;
        }

        let frame = Message::Text(Utf8Bytes::from(payload));
        let timeout = self.config.send_timeout;
        let outcomes = join_all(recipients.iter().map(|recipient| {
            let frame = frame.clone();
            async move { recipient.deliver(frame, timeout).await }
        }))
        .await;

        let mut delivered = 0;
        for (recipient, outcome) in recipients.iter().zip(outcomes) {
            if outcome.is_delivered() {
                delivered += 1;
            } else {
                self.evict(recipient, outcome).await;
            }
        }

        self.metrics.broadcast_published(recipients.len(), delivered);
        debug!(
            "Broadcast to institution {institution_id}: {delivered}/{} delivered",
            recipients.len()
        );

        delivered
    }

    async fn evict(&self, recipient: &ConnectionHandle, outcome: DeliveryOutcome) {
        warn!(
            target: EVENTS_TARGET,
            "event=send_error institution_id={} connection_id={} remote={} outcome={}",
            recipient.institution_id,
            recipient.connection_id,
            recipient.remote,
            outcome
        );
        self.metrics.delivery_failed(outcome.as_str());
        self.registry
            .remove(recipient.institution_id, recipient.connection_id)
            .await;
        // A slow subscriber still passes heartbeats, so its socket must be closed here.
        recipient.request_close();
    }
}

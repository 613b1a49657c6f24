use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics collector for relay operations
#[derive(Debug, Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "relay_ws" }
    }

    /// Record subscriber admitted and registered
    pub fn connection_established(&self) {
        counter!(format!("{}_connections_established_total", self.prefix)).increment(1);
        gauge!(format!("{}_connections_active", self.prefix)).increment(1.0);
    }

    /// Record registered subscriber leaving
    pub fn connection_closed(&self, reason: &str, session: Duration) {
        counter!(
            format!("{}_connections_closed_total", self.prefix),
            "reason" => reason.to_string()
        )
        .increment(1);
        gauge!(format!("{}_connections_active", self.prefix)).decrement(1.0);
        histogram!(format!("{}_session_duration_seconds", self.prefix))
            .record(session.as_secs_f64());
    }

    /// Record connection attempt refused before registration
    pub fn admission_rejected(&self, reason: &str) {
        counter!(
            format!("{}_admission_rejected_total", self.prefix),
            "reason" => reason.to_string()
        )
        .increment(1);
    }

    /// Record inbound client frame dropped without processing
    pub fn frame_discarded(&self) {
        counter!(format!("{}_frames_discarded_total", self.prefix)).increment(1);
    }

    /// Record one broadcast fan-out
    pub fn broadcast_published(&self, recipients: usize, delivered: usize) {
        counter!(format!("{}_broadcasts_total", self.prefix)).increment(1);
        counter!(format!("{}_deliveries_total", self.prefix)).increment(delivered as u64);
        histogram!(format!("{}_broadcast_recipients", self.prefix)).record(recipients as f64);
    }

    /// Record a recipient that could not be sent to
    pub fn delivery_failed(&self, kind: &str) {
        counter!(
            format!("{}_delivery_failures_total", self.prefix),
            "kind" => kind.to_string()
        )
        .increment(1);
    }

    /// Record a dead connection removed by the reaper
    pub fn connection_pruned(&self) {
        counter!(format!("{}_connections_pruned_total", self.prefix)).increment(1);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &str) {
        counter!(
            format!("{}_errors_total", self.prefix),
            "type" => error_type.to_string()
        )
        .increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

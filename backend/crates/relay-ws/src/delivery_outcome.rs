/// Result of handing one frame to one subscriber.
///
/// Anything other than `Delivered` evicts the subscriber from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Frame accepted by the connection's outbound queue
    Delivered,
    /// Transport already gone; the writer side has shut down
    Closed,
    /// Outbound queue stayed full for the whole send timeout
    TimedOut,
}

impl DeliveryOutcome {
    pub fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Label for logs and metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Closed => "closed",
            Self::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for connection limits
#[derive(Debug, Clone)]
pub struct ConnectionLimits {
    /// Maximum connections for a single institution
    pub max_per_institution: usize,
    /// Maximum total connections across all institutions
    pub max_total: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            max_per_institution: 1000,
            max_total: 10000,
        }
    }
}

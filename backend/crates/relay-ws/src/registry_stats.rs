use serde::Serialize;

/// Point-in-time registry size, read under a single lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RegistryStats {
    pub connections: usize,
    pub institutions: usize,
}

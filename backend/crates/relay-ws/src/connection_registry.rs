use crate::{
    ConnectionHandle, ConnectionId, ConnectionLimits, InstitutionId, RegistryStats,
    Result as WsErrorResult, WsError,
};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, warn};
use tokio::sync::RwLock;

/// Live subscriber connections, grouped by institution.
///
/// Invariant: an institution key is present iff its member set is non-empty.
/// All access goes through one lock; callers get materialized snapshots and
/// never hold the lock while sending.
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
}

#[derive(Default)]
struct RegistryInner {
    institutions: HashMap<InstitutionId, HashMap<ConnectionId, ConnectionHandle>>,
    /// Sum of all member set sizes
    total: usize,
}

impl ConnectionRegistry {
    pub fn new(limits: ConnectionLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
            limits,
        }
    }

    /// Add a connection to its institution's set, creating the set if needed.
    ///
    /// Re-adding a member is accepted and replaces the stored handle; limits
    /// only apply to new members.
    pub async fn add(&self, handle: ConnectionHandle) -> WsErrorResult<()> {
        let mut inner = self.inner.write().await;
        let institution_id = handle.institution_id;

        let current_for_institution = inner
            .institutions
            .get(&institution_id)
            .map(HashMap::len)
            .unwrap_or(0);
        let is_member = inner
            .institutions
            .get(&institution_id)
            .is_some_and(|members| members.contains_key(&handle.connection_id));

        if !is_member {
            if inner.total >= self.limits.max_total {
                warn!(
                    "Total connection limit reached: {}/{}",
                    inner.total, self.limits.max_total
                );
                return Err(WsError::ConnectionLimitExceeded {
                    current: inner.total,
                    max: self.limits.max_total,
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            if current_for_institution >= self.limits.max_per_institution {
                warn!(
                    "Institution {} connection limit reached: {}/{}",
                    institution_id, current_for_institution, self.limits.max_per_institution
                );
                return Err(WsError::InstitutionLimitExceeded {
                    institution_id,
                    current: current_for_institution,
                    max: self.limits.max_per_institution,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        let connection_id = handle.connection_id;
        let replaced = inner
            .institutions
            .entry(institution_id)
            .or_default()
            .insert(connection_id, handle);
        if replaced.is_none() {
            inner.total += 1;
        }

        debug!(
            "Added connection {connection_id} to institution {institution_id} ({} total)",
            inner.total
        );

        Ok(())
    }

    /// Remove a connection; prunes the institution key when its set empties.
    /// Returns false (and does nothing) when the pair is not registered.
    pub async fn remove(&self, institution_id: InstitutionId, connection_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;

        let Some(members) = inner.institutions.get_mut(&institution_id) else {
            return false;
        };
        if members.remove(&connection_id).is_none() {
            return false;
        }
        if members.is_empty() {
            inner.institutions.remove(&institution_id);
        }
        inner.total -= 1;

        debug!(
            "Removed connection {connection_id} from institution {institution_id} ({} remaining)",
            inner.total
        );

        true
    }

    /// Current members of one institution, detached from the registry
    pub async fn snapshot(&self, institution_id: InstitutionId) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        inner
            .institutions
            .get(&institution_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every registered connection, detached from the registry
    pub async fn entries(&self) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        inner
            .institutions
            .values()
            .flat_map(|members| members.values().cloned())
            .collect()
    }

    pub async fn contains(&self, institution_id: InstitutionId, connection_id: ConnectionId) -> bool {
        let inner = self.inner.read().await;
        inner
            .institutions
            .get(&institution_id)
            .is_some_and(|members| members.contains_key(&connection_id))
    }

    pub async fn has_subscribers(&self, institution_id: InstitutionId) -> bool {
        let inner = self.inner.read().await;
        inner.institutions.contains_key(&institution_id)
    }

    /// Members of one institution
    pub async fn institution_count(&self, institution_id: InstitutionId) -> usize {
        let inner = self.inner.read().await;
        inner
            .institutions
            .get(&institution_id)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    pub async fn total_connections(&self) -> usize {
        let inner = self.inner.read().await;
        inner.total
    }

    /// Institutions with at least one connection
    pub async fn tenant_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.institutions.len()
    }

    pub async fn stats(&self) -> RegistryStats {
        let inner = self.inner.read().await;
        RegistryStats {
            connections: inner.total,
            institutions: inner.institutions.len(),
        }
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
        }
    }
}

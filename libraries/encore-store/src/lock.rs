//! Per-entity mutation lock.

use encore_core::{EncoreError, EntityKey, Result};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Set of entities with an add/remove in flight.
#[derive(Debug, Default)]
pub(crate) struct MutationLocks {
    in_flight: Mutex<HashSet<EntityKey>>,
}

impl MutationLocks {
    /// Claim `key`, failing if another mutation already holds it.
    pub(crate) fn acquire(&self, key: &EntityKey) -> Result<MutationGuard<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(key.clone()) {
            debug!(key = %key, "Rejecting concurrent mutation");
            return Err(EncoreError::MutationInFlight(key.clone()));
        }
        Ok(MutationGuard {
            locks: self,
            key: key.clone(),
        })
    }

    pub(crate) fn is_locked(&self, key: &EntityKey) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases the entity on drop, including when the owning future is dropped.
pub(crate) struct MutationGuard<'a> {
    locks: &'a MutationLocks,
    key: EntityKey,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.locks
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

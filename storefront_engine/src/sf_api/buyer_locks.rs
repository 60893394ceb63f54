//! Per-buyer write serialisation.
//!
//! Cart replacement and order placement for one buyer must never interleave, otherwise two concurrent cart updates
//! could lose one another's writes, or a cart update could slip in between the cart read and the cart clear of a
//! checkout. Each buyer gets their own async mutex; buyers never wait on each other.
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use log::*;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::db_types::ActorId;

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Held for the duration of a buyer's cart or checkout operation. Dropping it releases the buyer.
pub type BuyerGuard = OwnedMutexGuard<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTimeout(pub Duration);

#[derive(Clone)]
pub struct BuyerLocks {
    locks: Arc<Mutex<HashMap<ActorId, Arc<AsyncMutex<()>>>>>,
    timeout: Duration,
}

impl Debug for BuyerLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuyerLocks (timeout: {:?})", self.timeout)
    }
}

impl Default for BuyerLocks {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl BuyerLocks {
    pub fn new(timeout: Duration) -> Self {
        Self { locks: Arc::new(Mutex::new(HashMap::new())), timeout }
    }

    /// Waits for exclusive access to `buyer`'s cart. Gives up with [`LockTimeout`] after the configured timeout.
    pub async fn lock(&self, buyer: &ActorId) -> Result<BuyerGuard, LockTimeout> {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries that nobody holds or waits on can go.
            locks.retain(|id, m| id == buyer || Arc::strong_count(m) > 1);
            Arc::clone(locks.entry(buyer.clone()).or_default())
        };
        trace!("🛒️ Waiting for the cart lock of {buyer}");
        tokio::time::timeout(self.timeout, mutex.lock_owned()).await.map_err(|_| {
            warn!("🛒️ Timed out after {:?} waiting for the cart lock of {buyer}", self.timeout);
            LockTimeout(self.timeout)
        })
    }

    /// The number of buyers currently tracked.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Per-MAC mutual exclusion.
//!
//! Imports for the same primary MAC run one at a time; imports for different
//! MACs never wait on each other. The registry only holds weak references, so
//! a MAC's lock disappears once nobody holds or waits for it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use pnet::util::MacAddr;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub struct MacLocks {
    locks: Mutex<HashMap<MacAddr, Weak<AsyncMutex<()>>>>,
}

/// Held for the duration of one import; released on drop.
pub struct MacGuard {
    _guard: OwnedMutexGuard<()>,
}

impl MacLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, mac: MacAddr) -> MacGuard {
        let lock = self.lock_for(mac);
        MacGuard {
            _guard: lock.lock_owned().await,
        }
    }

    fn lock_for(&self, mac: MacAddr) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(&mac).and_then(Weak::upgrade) {
            return lock;
        }

        locks.retain(|_, weak| weak.strong_count() > 0);
        let lock = Arc::new(AsyncMutex::new(()));
        locks.insert(mac, Arc::downgrade(&lock));
        lock
    }

    /// Number of MACs with a live lock.
    pub fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

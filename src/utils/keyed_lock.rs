//! Per-key async mutual exclusion.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A set of async mutexes addressed by key.
///
/// Tasks locking the same key run one at a time; tasks locking different
/// keys never wait on each other. An entry lives only while some task holds
/// or waits for it, so the map does not grow with the number of keys ever seen.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    entries: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `key` is free and returns a guard holding it.
    ///
    /// Cancel safe: dropping the future while it waits releases the entry
    /// just like dropping the guard does.
    pub async fn lock(&self, key: K) -> KeyedGuard<'_, K> {
        let entry = {
            let mut entries = self.entries.lock();
            entries.entry(key.clone()).or_default().clone()
        };

        // Registered before the await so a cancelled waiter still runs `release`.
        let mut pending = KeyedGuard {
            locks: self,
            key,
            guard: None,
        };
        pending.guard = Some(entry.lock_owned().await);

        pending
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, key: &K) {
        let mut entries = self.entries.lock();
        // Only the map itself still references the mutex: nobody holds or waits.
        if let Some(entry) = entries.get(key)
            && Arc::strong_count(entry) == 1
        {
            entries.remove(key);
        }
    }
}

/// Holds one key of a [`KeyedLocks`] until dropped.
///
/// While [`KeyedLocks::lock`] is still waiting, `guard` is `None`.
#[derive(Debug)]
pub struct KeyedGuard<'a, K: Eq + Hash + Clone> {
    locks: &'a KeyedLocks<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash + Clone> Drop for KeyedGuard<'_, K> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(&self.key);
    }
}

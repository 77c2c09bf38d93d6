//! Per-message lock table
//!
//! Serializes all work for one message key while letting different keys
//! run in parallel. Entries are removed once nobody holds or waits on them.

use std::sync::Arc;

use dashmap::DashMap;
use starboard_core::MessageKey;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by message
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<MessageKey, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a key
    ///
    /// The guard exists while waiting, so a caller that gives up before the
    /// lock is granted still prunes the entry.
    pub async fn lock(&self, key: &MessageKey) -> KeyGuard<'_> {
        let mutex = Arc::clone(&self.locks.entry(key.clone()).or_default());

        let mut key_guard = KeyGuard {
            table: self,
            key: key.clone(),
            guard: None,
        };
        key_guard.guard = Some(mutex.lock_owned().await);
        key_guard
    }

    /// Number of keys currently held or waited on
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one key; released on drop
#[derive(Debug)]
pub struct KeyGuard<'a> {
    table: &'a KeyedLocks,
    key: MessageKey,
    // None while still waiting
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // The owned guard keeps its own reference to the mutex, so release it
        // before checking whether the table holds the last one
        drop(self.guard.take());
        self.table
            .locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

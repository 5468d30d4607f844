//! Per-thread locking for comment mutations
//!
//! Every mutation of a comment thread (reply creation, content update, delete)
//! holds the write lock of the thread's root comment while it reads the
//! records it plans from and commits the result. Sibling deletes therefore run
//! one at a time, and the last one always sees every other removal.

use crate::types::CommentId;
use parking_lot::{ArcRwLockWriteGuard, RawRwLock, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-node lock manager
///
/// Locks are created on first use and dropped again when the last
/// [`ThreadGuard`] on them is released, so the map only holds threads that
/// are currently being written or waited on.
pub struct NodeLockManager {
    locks: RwLock<HashMap<CommentId, Arc<RwLock<()>>>>,
}

impl NodeLockManager {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Get the lock for a node, creating it if needed
    fn get_lock(&self, id: CommentId) -> Arc<RwLock<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(&id) {
                return lock.clone();
            }
        }

        // Another thread may have inserted it between the two map locks
        let mut map = self.locks.write();
        map.entry(id)
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Block until the thread rooted at `root` is exclusively held
    pub fn lock_thread(&self, root: CommentId) -> ThreadGuard<'_> {
        ThreadGuard {
            manager: self,
            root,
            guard: Some(self.get_lock(root).write_arc()),
        }
    }

    /// Remove the entry for `id` unless someone else still holds or awaits it.
    fn release(&self, id: CommentId) {
        let mut map = self.locks.write();
        // With the map locked nobody can clone the entry; a count of one is the map's own
        if map.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&id);
        }
    }

    /// Number of locks currently tracked
    pub fn tracked(&self) -> usize {
        self.locks.read().len()
    }
}

impl Default for NodeLockManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive hold on one comment thread; released on drop
pub struct ThreadGuard<'a> {
    manager: &'a NodeLockManager,
    root: CommentId,
    guard: Option<ArcRwLockWriteGuard<RawRwLock, ()>>,
}

impl Drop for ThreadGuard<'_> {
    fn drop(&mut self) {
        // The guard owns a clone of the lock; unlock before counting holders
        drop(self.guard.take());
        self.manager.release(self.root);
    }
}

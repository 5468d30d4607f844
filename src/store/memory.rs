//! In-memory comment store
//!
//! An id-indexed arena behind a single lock. Commits hold the write lock for
//! the whole batch, which makes them atomic.

use super::{CommentNode, CommentStore, CommitBatch, Directory, Item, Writer};
use crate::concurrency::NodeLockManager;
use crate::error::StorageError;
use crate::types::{CommentId, ItemId, WriterId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Arena {
    comments: HashMap<CommentId, CommentNode>,
    items: HashMap<ItemId, Item>,
    writers: HashMap<WriterId, Writer>,
}

pub struct MemoryCommentStore {
    arena: RwLock<Arena>,
    ids: AtomicU64,
    locks: Arc<NodeLockManager>,
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self {
            arena: RwLock::new(Arena::default()),
            ids: AtomicU64::new(1),
            locks: Arc::new(NodeLockManager::new()),
        }
    }

    /// Number of comment records currently stored, tombstones included
    pub fn len(&self) -> usize {
        self.arena.read().comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCommentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentStore for MemoryCommentStore {
    fn get(&self, id: CommentId) -> Result<Option<CommentNode>, StorageError> {
        Ok(self.arena.read().comments.get(&id).cloned())
    }

    fn next_id(&self) -> Result<CommentId, StorageError> {
        Ok(self.ids.fetch_add(1, Ordering::SeqCst))
    }

    fn commit(&self, batch: CommitBatch) -> Result<(), StorageError> {
        batch.check()?;
        let mut arena = self.arena.write();
        for node in batch.puts {
            arena.comments.insert(node.id, node);
        }
        for id in batch.deletes {
            arena.comments.remove(&id);
        }
        Ok(())
    }

    fn list_by_item(&self, item: ItemId) -> Result<Vec<CommentNode>, StorageError> {
        Ok(self
            .arena
            .read()
            .comments
            .values()
            .filter(|node| node.item == item)
            .cloned()
            .collect())
    }

    fn locks(&self) -> Arc<NodeLockManager> {
        self.locks.clone()
    }
}

impl Directory for MemoryCommentStore {
    fn item(&self, id: ItemId) -> Result<Option<Item>, StorageError> {
        Ok(self.arena.read().items.get(&id).cloned())
    }

    fn writer(&self, id: WriterId) -> Result<Option<Writer>, StorageError> {
        Ok(self.arena.read().writers.get(&id).cloned())
    }

    fn put_item(&self, title: &str) -> Result<Item, StorageError> {
        let item = Item {
            id: self.ids.fetch_add(1, Ordering::SeqCst),
            title: title.to_string(),
        };
        self.arena.write().items.insert(item.id, item.clone());
        Ok(item)
    }

    fn put_writer(&self, name: &str) -> Result<Writer, StorageError> {
        let writer = Writer {
            id: self.ids.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
        };
        self.arena.write().writers.insert(writer.id, writer.clone());
        Ok(writer)
    }
}

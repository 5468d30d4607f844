//! Comment Store
//!
//! Id-indexed storage for comment nodes and the item/writer directory they
//! reference. Nodes never own their neighbours: parent and children are ids
//! resolved through the store.

pub mod memory;
pub mod persistence;

use crate::concurrency::NodeLockManager;
use crate::error::StorageError;
use crate::types::{CommentId, ItemId, Timestamp, WriterId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Lifecycle state of a comment node
///
/// Transitions only move forward: `Live -> Tombstoned -> Purged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    Live,
    /// Removed by its author but retained so replies keep a parent
    Tombstoned,
    /// Physically deleted; only ever seen in a purge report
    Purged,
}

impl NodeState {
    pub fn is_removed(self) -> bool {
        match self {
            NodeState::Live => false,
            NodeState::Tombstoned | NodeState::Purged => true,
        }
    }
}

/// CommentNode: a root comment or a reply, with its tree edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: CommentId,
    pub content: String,
    pub(crate) writer: WriterId,
    pub(crate) item: ItemId,
    pub(crate) parent: Option<CommentId>,
    /// Replies; changed only by attachment and purge
    pub(crate) children: BTreeSet<CommentId>,
    state: NodeState,
    pub created_at: Timestamp,
}

impl CommentNode {
    /// Create a live, unattached node. Writer and item are wired by
    /// [`crate::tree::attach`] before the node is first stored.
    pub fn new(id: CommentId, content: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id,
            content: content.into(),
            writer: WriterId::default(),
            item: ItemId::default(),
            parent: None,
            children: BTreeSet::new(),
            state: NodeState::Live,
            created_at,
        }
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn writer(&self) -> WriterId {
        self.writer
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    /// None for root comments
    pub fn parent(&self) -> Option<CommentId> {
        self.parent
    }

    pub fn children(&self) -> &BTreeSet<CommentId> {
        &self.children
    }

    pub fn is_removed(&self) -> bool {
        self.state.is_removed()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The comment whose lock guards this node's thread.
    pub fn thread_root(&self) -> CommentId {
        self.parent.unwrap_or(self.id)
    }

    /// Mark the node removed. Returns false if it already was.
    pub fn tombstone(&mut self) -> bool {
        match self.state {
            NodeState::Live => {
                self.state = NodeState::Tombstoned;
                true
            }
            NodeState::Tombstoned | NodeState::Purged => false,
        }
    }

    /// Final transition, applied by the engine to members of a purge set.
    pub(crate) fn purge(mut self) -> Self {
        self.state = NodeState::Purged;
        self
    }
}

/// Content item that comments are posted on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
}

/// Member who writes comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Writer {
    pub id: WriterId,
    pub name: String,
}

/// Writes and deletes applied together by [`CommentStore::commit`]
#[derive(Debug, Clone, Default)]
pub struct CommitBatch {
    pub puts: Vec<CommentNode>,
    pub deletes: Vec<CommentId>,
}

impl CommitBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(mut self, node: CommentNode) -> Self {
        self.puts.push(node);
        self
    }

    pub fn delete_all(mut self, ids: impl IntoIterator<Item = CommentId>) -> Self {
        self.deletes.extend(ids);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.deletes.is_empty()
    }

    /// Reject batches that would persist a purged node.
    pub(crate) fn check(&self) -> Result<(), StorageError> {
        for node in &self.puts {
            match node.state() {
                NodeState::Live | NodeState::Tombstoned => {}
                NodeState::Purged => return Err(StorageError::PurgedRecord(node.id)),
            }
        }
        Ok(())
    }
}

/// Comment store interface
///
/// `commit` must apply every put and delete of a batch atomically: either all
/// of them become visible or none do.
pub trait CommentStore: Send + Sync {
    fn get(&self, id: CommentId) -> Result<Option<CommentNode>, StorageError>;
    fn next_id(&self) -> Result<CommentId, StorageError>;
    fn commit(&self, batch: CommitBatch) -> Result<(), StorageError>;
    fn list_by_item(&self, item: ItemId) -> Result<Vec<CommentNode>, StorageError>;

    /// Thread locks shared by every writer of this store
    fn locks(&self) -> Arc<NodeLockManager>;
}

/// Item and writer lookups used when attaching a new comment
pub trait Directory: Send + Sync {
    fn item(&self, id: ItemId) -> Result<Option<Item>, StorageError>;
    fn writer(&self, id: WriterId) -> Result<Option<Writer>, StorageError>;
    fn put_item(&self, title: &str) -> Result<Item, StorageError>;
    fn put_writer(&self, name: &str) -> Result<Writer, StorageError>;
}

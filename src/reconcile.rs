//! Tombstone Reconciliation
//!
//! Decides, on every delete, which comments may be purged from storage and
//! which must stay behind as tombstones because live replies still hang off
//! them. A root and its replies are purged together, exactly once, by the
//! delete that removes the last live member of the thread, whatever order the
//! deletes arrived in.
//!
//! Only one level is examined: a reply looks at its parent and siblings, a
//! root looks at its own replies.

use crate::concurrency::NodeLockManager;
use crate::error::{ApiError, StorageError};
use crate::store::{CommentNode, CommentStore, CommitBatch};
use crate::types::CommentId;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of planning a delete against the current store contents
#[derive(Debug, Clone)]
pub struct DeletePlan {
    /// The deleted node, tombstoned
    pub node: CommentNode,
    /// False when the node was already a tombstone
    pub newly_removed: bool,
    /// Nodes that became eligible for purge; all already removed
    pub purge: Vec<CommentNode>,
}

impl DeletePlan {
    /// The batch that records this plan: the tombstone alone, or the purge.
    pub fn to_batch(&self) -> CommitBatch {
        if !self.purge.is_empty() {
            CommitBatch::new().delete_all(self.purge.iter().map(|n| n.id))
        } else if self.newly_removed {
            CommitBatch::new().put(self.node.clone())
        } else {
            CommitBatch::new()
        }
    }
}

/// Result of a committed delete
#[derive(Debug, Clone)]
pub struct PurgeReport {
    pub comment_id: CommentId,
    pub newly_removed: bool,
    /// Purged nodes, each in the `Purged` state
    pub purged: Vec<CommentNode>,
}

impl PurgeReport {
    pub fn purged_ids(&self) -> Vec<CommentId> {
        self.purged.iter().map(|n| n.id).collect()
    }

    pub fn is_purged(&self, id: CommentId) -> bool {
        self.purged.iter().any(|n| n.id == id)
    }
}

/// Store reads with one pending, not yet committed, node layered on top.
struct Overlay<'a> {
    store: &'a dyn CommentStore,
    pending: &'a CommentNode,
}

impl Overlay<'_> {
    fn fetch(&self, from: CommentId, id: CommentId) -> Result<CommentNode, StorageError> {
        if id == self.pending.id {
            return Ok(self.pending.clone());
        }
        self.store
            .get(id)?
            .ok_or(StorageError::DanglingReference { from, to: id })
    }

    fn children(&self, node: &CommentNode) -> Result<Vec<CommentNode>, StorageError> {
        node.children
            .iter()
            .map(|&child| self.fetch(node.id, child))
            .collect()
    }
}

/// True when `children` is empty or every child is removed.
pub fn all_children_removed(children: &[CommentNode]) -> bool {
    children.iter().all(CommentNode::is_removed)
}

/// Tombstone `node` and compute the purge set. Reads only; nothing is written.
pub fn plan_delete(store: &dyn CommentStore, mut node: CommentNode) -> Result<DeletePlan, StorageError> {
    let newly_removed = node.tombstone();
    let overlay = Overlay {
        store,
        pending: &node,
    };

    let purge = match node.parent {
        Some(parent_id) => {
            let parent = overlay.fetch(node.id, parent_id)?;
            if !parent.is_removed() {
                debug!(comment_id = node.id, parent_id, "purge blocked by live parent");
                Vec::new()
            } else {
                let siblings = overlay.children(&parent)?;
                if all_children_removed(&siblings) {
                    std::iter::once(parent).chain(siblings).collect()
                } else {
                    debug!(comment_id = node.id, parent_id, "purge blocked by live sibling");
                    Vec::new()
                }
            }
        }
        None => {
            let children = overlay.children(&node)?;
            if all_children_removed(&children) {
                std::iter::once(node.clone()).chain(children).collect()
            } else {
                debug!(comment_id = node.id, "purge blocked by live reply");
                Vec::new()
            }
        }
    };

    Ok(DeletePlan {
        node,
        newly_removed,
        purge,
    })
}

/// Applies deletes against a store, one thread at a time.
pub struct ReconciliationEngine {
    store: Arc<dyn CommentStore>,
    locks: Arc<NodeLockManager>,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        let locks = store.locks();
        Self { store, locks }
    }

    /// Delete a comment. Authorization is the caller's job.
    pub fn delete(&self, id: CommentId) -> Result<PurgeReport, ApiError> {
        self.delete_checked(id, |_| Ok(()))
    }

    /// Delete a comment after `check` accepts the freshly loaded node.
    ///
    /// The check runs under the thread lock, so it sees the same record the
    /// delete is planned from.
    pub fn delete_checked<F>(&self, id: CommentId, check: F) -> Result<PurgeReport, ApiError>
    where
        F: FnOnce(&CommentNode) -> Result<(), ApiError>,
    {
        let root = self
            .store
            .get(id)?
            .ok_or(ApiError::CommentNotFound(id))?
            .thread_root();
        let _guard = self.locks.lock_thread(root);

        // Purged while we waited for the lock
        let node = self.store.get(id)?.ok_or(ApiError::CommentNotFound(id))?;
        check(&node)?;

        let plan = plan_delete(self.store.as_ref(), node)?;
        let batch = plan.to_batch();
        if !batch.is_empty() {
            self.store.commit(batch)?;
        }

        let purged: Vec<CommentNode> = plan.purge.into_iter().map(CommentNode::purge).collect();

        info!(
            comment_id = id,
            newly_removed = plan.newly_removed,
            purged = purged.len(),
            "comment deleted"
        );

        Ok(PurgeReport {
            comment_id: id,
            newly_removed: plan.newly_removed,
            purged,
        })
    }
}

//! Comment Service
//!
//! Surface actions over the store: posting root comments and replies,
//! editing, deleting and reading threads. Creation goes through tree
//! attachment; deletion goes through the reconciliation engine. Every write
//! to a thread holds that thread's lock.

use crate::auth::{AuthorGate, OwnershipGate, Principal};
use crate::concurrency::NodeLockManager;
use crate::error::ApiError;
use crate::reconcile::{PurgeReport, ReconciliationEngine};
use crate::store::{CommentNode, CommentStore, CommitBatch, Directory};
use crate::tree::{attach_to_item, attach_to_parent, attach_writer};
use crate::types::{CommentId, ItemId};
use crate::views::{build_thread, ThreadView};
use std::sync::Arc;
use tracing::info;

pub struct CommentService {
    store: Arc<dyn CommentStore>,
    directory: Arc<dyn Directory>,
    gate: Arc<dyn AuthorGate>,
    locks: Arc<NodeLockManager>,
    engine: ReconciliationEngine,
}

impl CommentService {
    /// Build a service over one backend serving both comments and the directory,
    /// with the ownership gate.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CommentStore + Directory + 'static,
    {
        Self::new(store.clone(), store, Arc::new(OwnershipGate))
    }

    /// Thread locks come from the store, so every service over one store
    /// serializes against the others.
    pub fn new(
        store: Arc<dyn CommentStore>,
        directory: Arc<dyn Directory>,
        gate: Arc<dyn AuthorGate>,
    ) -> Self {
        let locks = store.locks();
        let engine = ReconciliationEngine::new(store.clone());
        Self {
            store,
            directory,
            gate,
            locks,
            engine,
        }
    }

    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    /// Post a root comment on an item
    pub fn create_root_comment(
        &self,
        principal: &Principal,
        item: ItemId,
        content: &str,
    ) -> Result<CommentNode, ApiError> {
        let node = self.new_node(principal, item, content)?;
        self.store.commit(CommitBatch::new().put(node.clone()))?;
        info!(comment_id = node.id, item, writer = node.writer, "root comment created");
        Ok(node)
    }

    /// Post a reply to a root comment
    pub fn create_reply(
        &self,
        principal: &Principal,
        item: ItemId,
        parent: CommentId,
        content: &str,
    ) -> Result<CommentNode, ApiError> {
        let root = self.load(parent)?.thread_root();
        let mut node = self.new_node(principal, item, content)?;

        let _guard = self.locks.lock_thread(root);
        let mut parent = self.load(parent)?;
        attach_to_parent(&mut node, &mut parent)?;
        self.store
            .commit(CommitBatch::new().put(node.clone()).put(parent))?;

        info!(
            comment_id = node.id,
            parent_id = root,
            item,
            writer = node.writer,
            "reply created"
        );
        Ok(node)
    }

    /// Replace a comment's content. Allowed on tombstones too; views keep
    /// hiding tombstone content.
    pub fn update_content(
        &self,
        principal: &Principal,
        id: CommentId,
        content: &str,
    ) -> Result<CommentNode, ApiError> {
        validate_content(content)?;
        let root = self.load(id)?.thread_root();

        let _guard = self.locks.lock_thread(root);
        let mut node = self.load(id)?;
        self.gate.assert_author(principal, &node)?;
        node.content = content.to_string();
        self.store.commit(CommitBatch::new().put(node.clone()))?;

        info!(comment_id = id, removed = node.is_removed(), "comment content updated");
        Ok(node)
    }

    /// Delete a comment, purging whatever the delete makes eligible
    pub fn delete(&self, principal: &Principal, id: CommentId) -> Result<PurgeReport, ApiError> {
        self.engine
            .delete_checked(id, |node| self.gate.assert_author(principal, node))
    }

    /// Fetch a comment; tombstones included
    pub fn get(&self, id: CommentId) -> Result<CommentNode, ApiError> {
        self.load(id)
    }

    /// All comments of an item as a thread
    pub fn thread(&self, item: ItemId) -> Result<ThreadView, ApiError> {
        if self.directory.item(item)?.is_none() {
            return Err(ApiError::ItemNotFound(item));
        }
        Ok(build_thread(item, self.store.list_by_item(item)?))
    }

    fn load(&self, id: CommentId) -> Result<CommentNode, ApiError> {
        self.store.get(id)?.ok_or(ApiError::CommentNotFound(id))
    }

    /// Validate references and content, then build an attached, unstored node.
    fn new_node(
        &self,
        principal: &Principal,
        item: ItemId,
        content: &str,
    ) -> Result<CommentNode, ApiError> {
        validate_content(content)?;
        let writer = self
            .directory
            .writer(principal.writer_id)?
            .ok_or(ApiError::WriterNotFound(principal.writer_id))?;
        if self.directory.item(item)?.is_none() {
            return Err(ApiError::ItemNotFound(item));
        }

        let mut node = CommentNode::new(self.store.next_id()?, content, chrono::Utc::now());
        attach_writer(&mut node, writer.id);
        attach_to_item(&mut node, item);
        Ok(node)
    }
}

fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::EmptyContent);
    }
    Ok(())
}

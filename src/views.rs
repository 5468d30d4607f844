//! Thread Views
//!
//! Presentation of an item's comments as roots with their replies. Tombstones
//! keep their place in the thread but never expose their content.

use crate::store::CommentNode;
use crate::types::{CommentId, ItemId, Timestamp, WriterId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Text shown in place of a removed comment
pub const REMOVED_PLACEHOLDER: &str = "[removed]";

/// One comment as presented to readers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub writer: WriterId,
    /// None for tombstones
    pub content: Option<String>,
    pub removed: bool,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<CommentView>,
}

impl CommentView {
    fn from_node(node: &CommentNode) -> Self {
        let removed = node.is_removed();
        Self {
            id: node.id,
            writer: node.writer,
            content: if removed { None } else { Some(node.content.clone()) },
            removed,
            created_at: node.created_at,
            replies: Vec::new(),
        }
    }

    /// Content, or the placeholder for tombstones
    pub fn display_content(&self) -> &str {
        self.content.as_deref().unwrap_or(REMOVED_PLACEHOLDER)
    }
}

/// All comments of an item, oldest root first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadView {
    pub item: ItemId,
    pub comments: Vec<CommentView>,
}

impl ThreadView {
    /// Total number of entries, replies and tombstones included
    pub fn len(&self) -> usize {
        self.comments.iter().map(|c| 1 + c.replies.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Arrange an item's stored comments into a thread view
///
/// Roots and replies are each ordered by creation time, ties broken by id.
pub fn build_thread(item: ItemId, mut nodes: Vec<CommentNode>) -> ThreadView {
    nodes.sort_by_key(|n| (n.created_at, n.id));

    let mut replies: HashMap<CommentId, Vec<CommentView>> = HashMap::new();
    let mut roots = Vec::new();
    for node in &nodes {
        match node.parent {
            Some(parent) => replies
                .entry(parent)
                .or_default()
                .push(CommentView::from_node(node)),
            None => roots.push(CommentView::from_node(node)),
        }
    }

    for root in &mut roots {
        if let Some(children) = replies.remove(&root.id) {
            root.replies = children;
        }
    }
    for (parent, orphans) in &replies {
        warn!(
            item,
            parent_id = parent,
            count = orphans.len(),
            "replies without a stored parent left out of thread"
        );
    }

    ThreadView {
        item,
        comments: roots,
    }
}

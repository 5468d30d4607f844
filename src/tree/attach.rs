//! Tree attachment
//!
//! Wires a new node to its writer, its item and optionally a parent comment
//! before the node is first stored. Only in-memory fields change here; the
//! caller persists the node and the updated parent in one batch.

use crate::error::ApiError;
use crate::store::CommentNode;
use crate::types::{ItemId, WriterId};
use tracing::warn;

/// Set the authoring writer. Writer existence is checked by the caller.
pub fn attach_writer(node: &mut CommentNode, writer: WriterId) {
    node.writer = writer;
}

/// Set the item the comment is posted on.
pub fn attach_to_item(node: &mut CommentNode, item: ItemId) {
    node.item = item;
}

/// Make `node` a reply to `parent`, updating both ends of the edge.
///
/// The parent must be a root comment on the same item. Attach the item
/// first so the check sees the node's final item.
pub fn attach_to_parent(node: &mut CommentNode, parent: &mut CommentNode) -> Result<(), ApiError> {
    if !parent.is_root() {
        warn!(
            comment_id = node.id,
            parent_id = parent.id,
            "rejected reply to a reply"
        );
        return Err(ApiError::NestingUnsupported { parent: parent.id });
    }
    if parent.item != node.item {
        return Err(ApiError::ItemMismatch {
            parent: parent.id,
            parent_item: parent.item,
            item: node.item,
        });
    }

    node.parent = Some(parent.id);
    parent.children.insert(node.id);
    Ok(())
}

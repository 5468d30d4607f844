//! Authorship checks
//!
//! Identity and sessions are established elsewhere; by the time a request
//! reaches the comment service it carries a [`Principal`]. Edits and deletes
//! are only allowed for the comment's author.

use crate::error::ApiError;
use crate::store::CommentNode;
use crate::types::WriterId;
use serde::{Deserialize, Serialize};

/// The authenticated member making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub writer_id: WriterId,
}

impl Principal {
    pub fn new(writer_id: WriterId) -> Self {
        Self { writer_id }
    }
}

/// Gate consulted before a comment is edited or deleted
pub trait AuthorGate: Send + Sync {
    fn assert_author(&self, principal: &Principal, node: &CommentNode) -> Result<(), ApiError>;
}

/// Allows a request only when the principal wrote the comment
#[derive(Debug, Default, Clone, Copy)]
pub struct OwnershipGate;

impl AuthorGate for OwnershipGate {
    fn assert_author(&self, principal: &Principal, node: &CommentNode) -> Result<(), ApiError> {
        if node.writer == principal.writer_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden {
                writer: principal.writer_id,
                comment: node.id,
            })
        }
    }
}

//! Core identifier types for the remark comment system.

/// CommentId: Store-assigned identifier of a comment node
pub type CommentId = u64;

/// ItemId: Identifier of the content item a comment is posted on
pub type ItemId = u64;

/// WriterId: Identifier of the member who authored a comment
pub type WriterId = u64;

/// Timestamp used for creation ordering
pub type Timestamp = chrono::DateTime<chrono::Utc>;

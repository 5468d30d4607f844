//! Error types
//!
//! `StorageError` covers everything the persistence layer can fail with;
//! `ApiError` is what surface operations return and wraps storage failures
//! transparently so callers see them unchanged.

use crate::types::{CommentId, ItemId, WriterId};
use thiserror::Error;

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Record codec error: {0}")]
    Codec(String),

    #[error("Comment {from} references missing comment {to}")]
    DanglingReference { from: CommentId, to: CommentId },

    #[error("Refusing to store purged comment {0}")]
    PurgedRecord(CommentId),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        match err {
            sled::Error::Io(e) => StorageError::IoError(e),
            other => StorageError::Database(other.to_string()),
        }
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Codec(err.to_string())
    }
}

/// Errors returned by comment operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Writer not found: {0}")]
    WriterNotFound(WriterId),

    #[error("Writer {writer} is not the author of comment {comment}")]
    Forbidden { writer: WriterId, comment: CommentId },

    #[error("Comment {parent} is a reply; replies cannot be nested")]
    NestingUnsupported { parent: CommentId },

    #[error("Comment {parent} belongs to item {parent_item}, not item {item}")]
    ItemMismatch {
        parent: CommentId,
        parent_item: ItemId,
        item: ItemId,
    },

    #[error("Comment content cannot be empty")]
    EmptyContent,

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl ApiError {
    /// True for the not-found family of errors
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::CommentNotFound(_) | ApiError::ItemNotFound(_) | ApiError::WriterNotFound(_)
        )
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

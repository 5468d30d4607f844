//! Remark: Comment Threads with Tombstone Reconciliation
//!
//! Root comments and one level of replies on content items. Deleting a
//! comment that still has live replies leaves a tombstone; once a whole
//! thread is removed it is purged from storage in one atomic commit.

pub mod auth;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod service;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod views;

//! Comment tree
//!
//! Edge wiring for new comments. Edges are created only here and destroyed
//! only by the reconciliation engine's purge.

pub mod attach;

pub use attach::{attach_to_item, attach_to_parent, attach_writer};

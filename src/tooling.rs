//! Tooling & Integration Layer
//!
//! Command-line access to a comment store.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};

//! Walks a remote repository tree.
//!
//! The walk is iterative: pending directories sit on an explicit LIFO stack,
//! so arbitrarily deep trees never grow the call stack. Each directory path is
//! listed at most once, even when a provider listing points back at a
//! directory that was already expanded.

mod walker;

pub use walker::{display_prefix, visit, walk};

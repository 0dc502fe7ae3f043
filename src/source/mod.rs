// src/source/mod.rs
//! Read-only access to a remote repository.
//!
//! The rest of the crate only talks to a repository through the [`RepoSource`]
//! trait: list a directory's immediate children, fetch one file. This module
//! provides:
//! - [`GitHubClient`], backed by the GitHub REST Contents API via `reqwest`.
//! - [`MemoryRepo`], an in-memory tree for tests and offline demos.
//! - Parsing of GitHub repository URLs.

mod github;
mod memory;
mod url;

pub use github::GitHubClient;
pub use memory::MemoryRepo;
pub use url::{parse_repo_url, RepoRef};

use crate::core_types::{DirectoryEntry, FileBlob};
use crate::errors::Result;

/// A capability bound to one remote repository.
///
/// Implementations block until the provider responds. Errors from
/// `list_children` abort an analysis; errors from `fetch_file` are turned into
/// inline markers by the content aggregator.
pub trait RepoSource: Send + Sync {
    /// Lists the immediate children of the directory at `path` (`""` is the root).
    fn list_children(&self, path: &str) -> Result<Vec<DirectoryEntry>>;

    /// Fetches a single file.
    ///
    /// A blob without a usable encoding is a valid outcome, not an error.
    fn fetch_file(&self, path: &str) -> Result<FileBlob>;

    /// Base URL (with trailing slash) under which raw file content is served,
    /// if the provider has one. Used to rewrite relative README image paths.
    fn raw_url_base(&self) -> Option<String> {
        None
    }
}

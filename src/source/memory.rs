//! An in-memory repository.

use super::RepoSource;
use crate::core_types::{DirectoryEntry, FileBlob};
use crate::errors::{Error, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// A repository held entirely in memory.
///
/// Directories are created implicitly from file paths. Children are listed in
/// insertion order. Every `list_children` and `fetch_file` call is recorded so
/// callers can check how the tree was accessed.
///
/// # Examples
///
/// ```
/// use repodigest::source::{MemoryRepo, RepoSource};
///
/// let repo = MemoryRepo::new()
///     .with_file("a.txt", "hello")
///     .with_file("sub/b.md", "world");
///
/// let root = repo.list_children("").unwrap();
/// assert_eq!(root.len(), 2);
/// assert_eq!(repo.fetch_file("sub/b.md").unwrap().data, b"world");
/// assert_eq!(repo.listed_paths(), vec!["".to_string()]);
/// ```
#[derive(Debug)]
pub struct MemoryRepo {
    dirs: BTreeMap<String, Vec<DirectoryEntry>>,
    files: HashMap<String, FileBlob>,
    broken_dirs: HashSet<String>,
    broken_files: HashSet<String>,
    raw_base: Option<String>,
    listed: Mutex<Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl Default for MemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepo {
    /// Creates a repository containing only an empty root directory.
    pub fn new() -> Self {
        let mut dirs = BTreeMap::new();
        dirs.insert(String::new(), Vec::new());
        Self {
            dirs,
            files: HashMap::new(),
            broken_dirs: HashSet::new(),
            broken_files: HashSet::new(),
            raw_base: None,
            listed: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Adds a text file.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.with_blob(path, FileBlob::new(content.as_bytes()))
    }

    /// Adds a file with arbitrary bytes.
    pub fn with_bytes(self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.with_blob(path, FileBlob::new(data))
    }

    /// Adds a file for which the provider reports no encoding.
    pub fn with_unencoded_file(self, path: &str) -> Self {
        self.with_blob(path, FileBlob::without_encoding())
    }

    /// Adds a file with an explicit blob.
    pub fn with_blob(mut self, path: &str, blob: FileBlob) -> Self {
        let (parent, name) = split_path(path);
        self.ensure_dir(parent);
        if !self.files.contains_key(path) {
            if let Some(children) = self.dirs.get_mut(parent) {
                children.push(DirectoryEntry::file(name, path));
            }
        }
        self.files.insert(path.to_string(), blob);
        self
    }

    /// Adds an (empty) directory.
    pub fn with_dir(mut self, path: &str) -> Self {
        self.ensure_dir(path);
        self
    }

    /// Appends a raw entry to the listing of `dir`, bypassing any consistency checks.
    ///
    /// Useful to model provider listings that point at an already listed directory.
    pub fn with_entry(mut self, dir: &str, entry: DirectoryEntry) -> Self {
        self.ensure_dir(dir);
        if let Some(children) = self.dirs.get_mut(dir) {
            children.push(entry);
        }
        self
    }

    /// Makes `list_children(path)` fail with a provider error.
    pub fn with_broken_dir(mut self, path: &str) -> Self {
        self.broken_dirs.insert(path.to_string());
        self
    }

    /// Makes `fetch_file(path)` fail with a provider error.
    pub fn with_broken_file(mut self, path: &str) -> Self {
        self.broken_files.insert(path.to_string());
        self
    }

    /// Sets the value returned by `raw_url_base`.
    pub fn with_raw_url_base(mut self, base: &str) -> Self {
        self.raw_base = Some(base.to_string());
        self
    }

    /// Paths passed to `list_children`, in call order.
    pub fn listed_paths(&self) -> Vec<String> {
        self.listed.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Paths passed to `fetch_file`, in call order.
    pub fn fetched_paths(&self) -> Vec<String> {
        self.fetched.lock().map(|f| f.clone()).unwrap_or_default()
    }

    fn ensure_dir(&mut self, path: &str) {
        if self.dirs.contains_key(path) {
            return;
        }
        let (parent, name) = split_path(path);
        self.ensure_dir(parent);
        self.dirs.insert(path.to_string(), Vec::new());
        if let Some(children) = self.dirs.get_mut(parent) {
            children.push(DirectoryEntry::directory(name, path));
        }
    }
}

/// Splits `a/b/c` into (`a/b`, `c`). Top-level names have an empty parent.
fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

impl RepoSource for MemoryRepo {
    fn list_children(&self, path: &str) -> Result<Vec<DirectoryEntry>> {
        if let Ok(mut listed) = self.listed.lock() {
            listed.push(path.to_string());
        }
        if self.broken_dirs.contains(path) {
            return Err(Error::Provider {
                path: path.to_string(),
                status: 500,
                message: "listing failed".to_string(),
            });
        }
        self.dirs.get(path).cloned().ok_or_else(|| Error::NotFound {
            path: path.to_string(),
        })
    }

    fn fetch_file(&self, path: &str) -> Result<FileBlob> {
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(path.to_string());
        }
        if self.broken_files.contains(path) {
            return Err(Error::Provider {
                path: path.to_string(),
                status: 500,
                message: "fetch failed".to_string(),
            });
        }
        self.files.get(path).cloned().ok_or_else(|| Error::NotFound {
            path: path.to_string(),
        })
    }

    fn raw_url_base(&self) -> Option<String> {
        self.raw_base.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_directories_are_created() {
        let repo = MemoryRepo::new().with_file("a/b/c.txt", "x");
        let root = repo.list_children("").unwrap();
        assert_eq!(root, vec![DirectoryEntry::directory("a", "a")]);
        let a = repo.list_children("a").unwrap();
        assert_eq!(a, vec![DirectoryEntry::directory("b", "a/b")]);
        let b = repo.list_children("a/b").unwrap();
        assert_eq!(b, vec![DirectoryEntry::file("c.txt", "a/b/c.txt")]);
    }

    #[test]
    fn test_missing_paths_are_not_found() {
        let repo = MemoryRepo::new();
        assert!(repo.list_children("nope").unwrap_err().is_not_found());
        assert!(repo.fetch_file("nope.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_broken_paths_fail() {
        let repo = MemoryRepo::new()
            .with_file("x.txt", "x")
            .with_broken_dir("")
            .with_broken_file("x.txt");
        assert!(repo.list_children("").is_err());
        assert!(!repo.fetch_file("x.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_overwriting_a_file_keeps_one_entry() {
        let repo = MemoryRepo::new()
            .with_file("a.txt", "one")
            .with_file("a.txt", "two");
        assert_eq!(repo.list_children("").unwrap().len(), 1);
        assert_eq!(repo.fetch_file("a.txt").unwrap().data, b"two");
    }
}

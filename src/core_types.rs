//! Defines core data structures used throughout the analysis pipeline.
//!
//! `DirectoryEntry` and `FileBlob` describe what a repository source returns,
//! `FileOutcome` classifies what happened to a single file during content
//! aggregation, and `Analysis` holds the sections produced by one run.

use serde::Serialize;

/// A single child of a repository directory.
///
/// Paths are provider paths: slash-joined ancestor names without a leading
/// slash (`"src/main.rs"`). Provider items that are neither plain files nor
/// directories (symlinks, submodules) are represented as files; their payload
/// typically comes back without an encoding.
///
/// # Examples
///
/// ```
/// use repodigest::core_types::DirectoryEntry;
///
/// let entry = DirectoryEntry::file("main.rs", "src/main.rs");
/// assert_eq!(entry.name(), "main.rs");
/// assert!(!entry.is_dir());
///
/// let dir = DirectoryEntry::directory("src", "src");
/// assert!(dir.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEntry {
    /// A directory that can be expanded with `list_children`.
    Directory {
        /// The entry name (last path component).
        name: String,
        /// The full provider path.
        path: String,
    },
    /// A file, possibly with its payload already attached.
    File {
        /// The entry name (last path component).
        name: String,
        /// The full provider path.
        path: String,
        /// Size in bytes as reported by the provider, if known.
        size: Option<u64>,
        /// Payload attached to the listing. `None` means it has to be fetched.
        blob: Option<FileBlob>,
    },
}

impl DirectoryEntry {
    /// Creates a directory entry.
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        DirectoryEntry::Directory {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a file entry without an attached payload.
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        DirectoryEntry::File {
            name: name.into(),
            path: path.into(),
            size: None,
            blob: None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DirectoryEntry::Directory { name, .. } | DirectoryEntry::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            DirectoryEntry::Directory { path, .. } | DirectoryEntry::File { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, DirectoryEntry::Directory { .. })
    }
}

/// The payload of a file as returned by the provider.
///
/// `data` already has any transport encoding (GitHub's base64) removed.
/// `encoding` is what the provider declared: `None` or `"none"` means the
/// content is not retrievable through this API (oversized files, submodules,
/// symlinks the provider does not resolve).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileBlob {
    pub encoding: Option<String>,
    pub data: Vec<u8>,
}

impl FileBlob {
    /// A blob whose content was delivered (declared as base64 by GitHub).
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            encoding: Some("base64".to_string()),
            data: data.into(),
        }
    }

    /// A blob for which the provider reported no usable encoding.
    pub fn without_encoding() -> Self {
        Self {
            encoding: None,
            data: Vec::new(),
        }
    }

    /// Returns `true` if the provider declared a usable encoding.
    pub fn has_encoding(&self) -> bool {
        matches!(&self.encoding, Some(enc) if !enc.eq_ignore_ascii_case("none"))
    }
}

/// What content aggregation did with a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file decoded as UTF-8 text.
    Text(String),
    /// The file name matched the binary deny-list. Its payload was never fetched.
    BinarySkipped,
    /// The provider declared no encoding for the file.
    EncodingMissing,
    /// The payload is not valid UTF-8.
    DecodeFailed,
    /// Fetching the payload failed.
    AccessError,
}

/// The sections produced by one analysis run.
///
/// Everything here is plain text. [`Analysis::to_export`] assembles the
/// downloadable document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    /// The repository URL as given by the user.
    pub repo_url: String,
    /// README text, or the "not found" sentinel.
    pub readme: String,
    /// LICENSE text, or the "not found" sentinel.
    pub license: String,
    /// Newline-delimited path listing.
    pub structure: String,
    /// Concatenated per-file fragments.
    pub contents: String,
}

impl Analysis {
    /// Returns `true` if a license file was found.
    pub fn has_license(&self) -> bool {
        self.license != crate::constants::LICENSE_NOT_FOUND
    }

    /// Builds the combined export document.
    pub fn to_export(&self) -> String {
        crate::output::export::build_export(self)
    }
}

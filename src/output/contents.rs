// src/output/contents.rs

use crate::constants::{
    MARKER_ACCESS_ERROR, MARKER_BINARY, MARKER_DECODE_FAILED, MARKER_MISSING_ENCODING,
};
use crate::core_types::{DirectoryEntry, FileBlob, FileOutcome};
use crate::filtering::{is_doc_file, DenyList};
use crate::source::RepoSource;
use log::{debug, warn};

/// Returns the code-fence tag for a file name: the text after the last `.`,
/// or the whole name when it has none.
///
/// ```
/// use repodigest::output::contents::fence_tag;
///
/// assert_eq!(fence_tag("main.rs"), "rs");
/// assert_eq!(fence_tag("archive.tar.gz"), "gz");
/// assert_eq!(fence_tag("Makefile"), "Makefile");
/// assert_eq!(fence_tag(".env"), "env");
/// ```
pub fn fence_tag(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Decides what happens to one entry during content aggregation.
///
/// Returns `None` for entries that contribute nothing: directories and the
/// README/LICENSE at the repository root. Deny-listed names are classified
/// before any fetch.
pub fn classify_file(
    source: &dyn RepoSource,
    deny_list: &DenyList,
    entry: &DirectoryEntry,
) -> Option<FileOutcome> {
    let DirectoryEntry::File {
        name, path, blob, ..
    } = entry
    else {
        return None;
    };

    if is_doc_file(path) {
        debug!("Leaving '{}' to the README/LICENSE fetchers", path);
        return None;
    }
    if deny_list.is_denied(name) {
        debug!("Skipping binary file '{}'", path);
        return Some(FileOutcome::BinarySkipped);
    }

    let fetched;
    let blob: &FileBlob = match blob {
        Some(blob) => blob,
        None => match source.fetch_file(path) {
            Ok(b) => {
                fetched = b;
                &fetched
            }
            Err(e) => {
                warn!("Could not fetch '{}': {}", path, e);
                return Some(FileOutcome::AccessError);
            }
        },
    };

    if !blob.has_encoding() {
        debug!("No encoding for '{}'", path);
        return Some(FileOutcome::EncodingMissing);
    }
    match std::str::from_utf8(&blob.data) {
        Ok(text) => Some(FileOutcome::Text(text.to_string())),
        Err(_) => {
            debug!("'{}' is not valid UTF-8", path);
            Some(FileOutcome::DecodeFailed)
        }
    }
}

/// Renders the fragment for one classified file.
///
/// `display_path` is the path shown after `File:` and `name` supplies the
/// fence tag for text content.
pub fn render_fragment(display_path: &str, name: &str, outcome: &FileOutcome) -> String {
    let marker = match outcome {
        FileOutcome::Text(text) => {
            return format!(
                "File: {}\nContent:\n```{}\n{}\n```\n\n",
                display_path,
                fence_tag(name),
                text
            );
        }
        FileOutcome::BinarySkipped => MARKER_BINARY,
        FileOutcome::EncodingMissing => MARKER_MISSING_ENCODING,
        FileOutcome::DecodeFailed => MARKER_DECODE_FAILED,
        FileOutcome::AccessError => MARKER_ACCESS_ERROR,
    };
    format!("File: {}\nContent: {}\n\n", display_path, marker)
}

/// The content-aggregation processing function, bound to one source and deny-list.
pub struct ContentRenderer<'a> {
    source: &'a dyn RepoSource,
    deny_list: &'a DenyList,
}

impl<'a> ContentRenderer<'a> {
    pub fn new(source: &'a dyn RepoSource, deny_list: &'a DenyList) -> Self {
        Self { source, deny_list }
    }

    /// Renders the fragment for `entry` listed under `prefix`, or `""`.
    pub fn render(&self, prefix: &str, entry: &DirectoryEntry) -> String {
        match classify_file(self.source, self.deny_list, entry) {
            Some(outcome) => {
                let display_path = format!("{}/{}", prefix, entry.name());
                render_fragment(&display_path, entry.name(), &outcome)
            }
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::walk;
    use crate::errors::Result;
    use crate::source::MemoryRepo;

    fn render_all(repo: &MemoryRepo) -> Result<String> {
        let deny = DenyList::default();
        let renderer = ContentRenderer::new(repo, &deny);
        walk(repo, true, |prefix, entry| renderer.render(prefix, entry))
    }

    #[test]
    fn test_text_file_fragment() -> Result<()> {
        let repo = MemoryRepo::new().with_file("src/main.rs", "fn main() {}");
        let contents = render_all(&repo)?;
        assert_eq!(
            contents,
            "File: /src/main.rs\nContent:\n```rs\nfn main() {}\n```\n\n"
        );
        Ok(())
    }

    #[test]
    fn test_denied_file_is_never_fetched() -> Result<()> {
        let repo = MemoryRepo::new().with_bytes("photo.PNG", vec![0x89, 0x50, 0x4e, 0x47]);
        let contents = render_all(&repo)?;
        assert_eq!(contents, "File: /photo.PNG\nContent: Skipped binary file\n\n");
        assert!(repo.fetched_paths().is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_yields_marker_without_bytes() -> Result<()> {
        let repo = MemoryRepo::new().with_bytes("data.raw", vec![0xff, 0xfe, 0x41]);
        let contents = render_all(&repo)?;
        assert_eq!(
            contents,
            "File: /data.raw\nContent: Skipped due to encoding issues\n\n"
        );
        assert!(!contents.contains('A'));
        Ok(())
    }

    #[test]
    fn test_missing_encoding_and_access_error() -> Result<()> {
        let repo = MemoryRepo::new()
            .with_unencoded_file("huge.txt")
            .with_file("secret.txt", "x")
            .with_broken_file("secret.txt");
        let contents = render_all(&repo)?;
        assert!(contents.contains("File: /huge.txt\nContent: Skipped due to missing encoding\n\n"));
        assert!(contents.contains("File: /secret.txt\nContent: Skipped due to access error\n\n"));
        Ok(())
    }

    #[test]
    fn test_doc_files_and_directories_emit_nothing() -> Result<()> {
        let repo = MemoryRepo::new()
            .with_file("README.md", "# Title")
            .with_file("license", "MIT")
            .with_dir("empty");
        assert_eq!(render_all(&repo)?, "");
        assert!(repo.fetched_paths().is_empty());
        Ok(())
    }

    #[test]
    fn test_nested_doc_files_are_rendered() -> Result<()> {
        let repo = MemoryRepo::new()
            .with_file("packages/core/README.md", "core package docs")
            .with_file("third_party/LICENSE", "BSD");
        let contents = render_all(&repo)?;
        assert!(contents.contains(
            "File: /packages/core/README.md\nContent:\n```md\ncore package docs\n```\n\n"
        ));
        assert!(contents.contains("File: /third_party/LICENSE\nContent:\n```LICENSE\nBSD\n```\n\n"));
        Ok(())
    }

    #[test]
    fn test_prefetched_blob_skips_fetch() {
        let repo = MemoryRepo::new();
        let entry = DirectoryEntry::File {
            name: "inline.txt".to_string(),
            path: "inline.txt".to_string(),
            size: Some(2),
            blob: Some(FileBlob::new("hi")),
        };
        let outcome = classify_file(&repo, &DenyList::default(), &entry);
        assert_eq!(outcome, Some(FileOutcome::Text("hi".to_string())));
        assert!(repo.fetched_paths().is_empty());
    }

    #[test]
    fn test_file_without_dot_uses_whole_name() {
        let fragment = render_fragment("/Makefile", "Makefile", &FileOutcome::Text("all:".into()));
        assert_eq!(fragment, "File: /Makefile\nContent:\n```Makefile\nall:\n```\n\n");
    }
}

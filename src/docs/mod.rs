//! Fetches the README and LICENSE from the repository root.
//!
//! Each fetcher probes a fixed list of candidate names in order and returns
//! the first one that decodes as UTF-8 text, or a sentinel string when none
//! does. A missing README or LICENSE is never an error.

mod images;

pub use images::{rewrite_image_paths, rewrite_image_url};

use crate::constants::{LICENSE_CANDIDATES, LICENSE_NOT_FOUND, README_CANDIDATES, README_NOT_FOUND};
use crate::source::RepoSource;
use log::{debug, warn};

/// Returns the first candidate at the repository root that decodes as text.
///
/// Candidates that are missing, have no encoding or are not valid UTF-8 are
/// skipped. Other fetch errors are logged and skipped as well.
pub fn fetch_first_text(source: &dyn RepoSource, candidates: &[&str]) -> Option<String> {
    for name in candidates {
        let blob = match source.fetch_file(name) {
            Ok(blob) => blob,
            Err(e) if e.is_not_found() => {
                debug!("No '{}' at the repository root", name);
                continue;
            }
            Err(e) => {
                warn!("Could not fetch '{}': {}", name, e);
                continue;
            }
        };
        if !blob.has_encoding() {
            debug!("'{}' has no encoding, trying the next candidate", name);
            continue;
        }
        match String::from_utf8(blob.data) {
            Ok(text) => {
                debug!("Using '{}'", name);
                return Some(text);
            }
            Err(_) => debug!("'{}' is not valid UTF-8, trying the next candidate", name),
        }
    }
    None
}

/// Fetches the README, or returns `"README not found."`.
///
/// With `rewrite_images` set and a raw-content base available from the
/// source, relative image paths are rewritten into absolute URLs.
///
/// # Examples
///
/// ```
/// use repodigest::docs::fetch_readme;
/// use repodigest::source::MemoryRepo;
///
/// let repo = MemoryRepo::new()
///     .with_file("readme.md", "![logo](./logo.png)")
///     .with_raw_url_base("https://raw.githubusercontent.com/o/r/main/");
///
/// assert_eq!(
///     fetch_readme(&repo, true),
///     "![logo](https://raw.githubusercontent.com/o/r/main/logo.png)"
/// );
/// assert_eq!(fetch_readme(&repo, false), "![logo](./logo.png)");
/// ```
pub fn fetch_readme(source: &dyn RepoSource, rewrite_images: bool) -> String {
    let Some(text) = fetch_first_text(source, README_CANDIDATES) else {
        return README_NOT_FOUND.to_string();
    };
    match (rewrite_images, source.raw_url_base()) {
        (true, Some(base)) => rewrite_image_paths(&text, &base),
        _ => text,
    }
}

/// Fetches the LICENSE, or returns `"LICENSE not found."`.
pub fn fetch_license(source: &dyn RepoSource) -> String {
    fetch_first_text(source, LICENSE_CANDIDATES).unwrap_or_else(|| LICENSE_NOT_FOUND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryRepo;

    #[test]
    fn test_lowercase_readme_is_found() {
        let repo = MemoryRepo::new().with_file("readme.md", "lower");
        assert_eq!(fetch_readme(&repo, true), "lower");
        assert_eq!(
            repo.fetched_paths(),
            vec!["README.md".to_string(), "readme.md".to_string()]
        );
    }

    #[test]
    fn test_first_candidate_wins() {
        let repo = MemoryRepo::new()
            .with_file("README", "plain")
            .with_file("README.md", "markdown");
        assert_eq!(fetch_readme(&repo, false), "markdown");
    }

    #[test]
    fn test_readme_sentinel() {
        let repo = MemoryRepo::new().with_file("main.rs", "fn main() {}");
        assert_eq!(fetch_readme(&repo, true), "README not found.");
        assert_eq!(repo.fetched_paths().len(), README_CANDIDATES.len());
    }

    #[test]
    fn test_unusable_candidates_are_skipped() {
        let repo = MemoryRepo::new()
            .with_unencoded_file("LICENSE")
            .with_bytes("LICENSE.md", vec![0xc3, 0x28])
            .with_file("license", "broken")
            .with_broken_file("license")
            .with_file("License", "Apache-2.0");
        assert_eq!(fetch_license(&repo), "Apache-2.0");
    }

    #[test]
    fn test_license_sentinel() {
        let repo = MemoryRepo::new();
        assert_eq!(fetch_license(&repo), "LICENSE not found.");
    }

    #[test]
    fn test_no_rewrite_without_raw_base() {
        let repo = MemoryRepo::new().with_file("README.md", "![x](img/a.png)");
        assert_eq!(fetch_readme(&repo, true), "![x](img/a.png)");
    }
}

//! Handles parsing of GitHub repository URLs.

use crate::constants::RAW_CONTENT_HOST;
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Identifies a GitHub repository and, optionally, the ref to read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// The user or organization that owns the repository.
    pub owner: String,
    /// The repository name, without any `.git` suffix.
    pub repo: String,
    /// Branch, tag or commit taken from a `/tree/<ref>` URL. `None` means the default branch.
    pub git_ref: Option<String>,
}

impl RepoRef {
    /// Returns `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Returns the base URL under which raw file content is served for `branch`,
    /// with a trailing slash.
    ///
    /// ```
    /// use repodigest::source::parse_repo_url;
    ///
    /// let repo = parse_repo_url("https://github.com/rust-lang/cargo").unwrap();
    /// assert_eq!(
    ///     repo.raw_base_url("master"),
    ///     "https://raw.githubusercontent.com/rust-lang/cargo/master/"
    /// );
    /// ```
    pub fn raw_base_url(&self, branch: &str) -> String {
        format!(
            "{}/{}/{}/{}/",
            RAW_CONTENT_HOST, self.owner, self.repo, branch
        )
    }
}

/// `http(s)://[www.]github.com/<owner>/<repo>[/...]`
static GITHUB_HTTP_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?github\.com/([^/\s]+)/([^/\s]+)(/.*)?$").unwrap()
});

/// `git@github.com:<owner>/<repo>[.git]`
static GITHUB_SSH_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^git@github\.com:([^/\s]+)/([^/\s]+)$").unwrap());

/// `<owner>/<repo>`
static SHORTHAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").unwrap());

/// Parses a GitHub repository reference.
///
/// Accepts the browser URL (with or without `.git`, a trailing slash, or a
/// `/tree/<ref>` suffix), the SSH clone URL, and the `owner/repo` shorthand.
/// Query strings and fragments are ignored. Any other path after the
/// repository name is ignored as well.
///
/// # Examples
/// ```
/// use repodigest::source::{parse_repo_url, RepoRef};
///
/// let parsed = parse_repo_url("https://github.com/rust-lang/cargo/tree/master").unwrap();
/// assert_eq!(parsed, RepoRef {
///     owner: "rust-lang".to_string(),
///     repo: "cargo".to_string(),
///     git_ref: Some("master".to_string()),
/// });
///
/// let ssh = parse_repo_url("git@github.com:tokio-rs/axum.git").unwrap();
/// assert_eq!(ssh.full_name(), "tokio-rs/axum");
///
/// assert!(parse_repo_url("https://gitlab.com/user/repo").is_err());
/// ```
pub fn parse_repo_url(input: &str) -> Result<RepoRef> {
    let trimmed = input.trim();
    // Drop query string and fragment before matching.
    let without_query = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let (owner, repo, rest) = if let Some(caps) = GITHUB_HTTP_URL_RE.captures(without_query) {
        (
            caps[1].to_string(),
            caps[2].to_string(),
            caps.get(3).map(|m| m.as_str().to_string()),
        )
    } else if let Some(caps) = GITHUB_SSH_URL_RE.captures(without_query) {
        (caps[1].to_string(), caps[2].to_string(), None)
    } else if let Some(caps) = SHORTHAND_RE.captures(without_query) {
        (caps[1].to_string(), caps[2].to_string(), None)
    } else {
        return Err(Error::InvalidRepoUrl(input.to_string()));
    };

    let repo = repo.trim_end_matches(".git").to_string();
    if owner.is_empty() || repo.is_empty() || owner == "." || repo == "." {
        return Err(Error::InvalidRepoUrl(input.to_string()));
    }

    let git_ref = rest
        .as_deref()
        .and_then(|r| r.strip_prefix("/tree/"))
        .map(|r| r.trim_matches('/').to_string())
        .filter(|r| !r.is_empty());

    log::debug!(
        "Parsed '{}' as {}/{} (ref: {:?})",
        input,
        owner,
        repo,
        git_ref
    );

    Ok(RepoRef {
        owner,
        repo,
        git_ref,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(owner: &str, repo: &str, git_ref: Option<&str>) -> RepoRef {
        RepoRef {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: git_ref.map(String::from),
        }
    }

    #[test]
    fn test_parse_plain_https_url() {
        assert_eq!(
            parse_repo_url("https://github.com/BurntSushi/ripgrep").unwrap(),
            parsed("BurntSushi", "ripgrep", None)
        );
    }

    #[test]
    fn test_parse_url_variants() {
        let expected = parsed("BurntSushi", "ripgrep", None);
        for url in [
            "https://github.com/BurntSushi/ripgrep.git",
            "https://github.com/BurntSushi/ripgrep/",
            "http://www.github.com/BurntSushi/ripgrep",
            "github.com/BurntSushi/ripgrep",
            "  https://github.com/BurntSushi/ripgrep?tab=readme  ",
            "https://github.com/BurntSushi/ripgrep#readme",
            "git@github.com:BurntSushi/ripgrep.git",
            "BurntSushi/ripgrep",
            "https://github.com/BurntSushi/ripgrep/issues/1",
        ] {
            assert_eq!(parse_repo_url(url).unwrap(), expected, "input: {}", url);
        }
    }

    #[test]
    fn test_parse_tree_ref() {
        assert_eq!(
            parse_repo_url("https://github.com/BurntSushi/ripgrep/tree/master").unwrap(),
            parsed("BurntSushi", "ripgrep", Some("master"))
        );
        // Refs containing slashes are kept whole.
        assert_eq!(
            parse_repo_url("https://github.com/user/repo/tree/feature/login/").unwrap(),
            parsed("user", "repo", Some("feature/login"))
        );
    }

    #[test]
    fn test_parse_rejects_other_hosts_and_garbage() {
        for url in [
            "https://gitlab.com/user/repo",
            "https://github.com/user",
            "just-a-word",
            "",
            "/local/path/to/repo",
        ] {
            assert!(
                matches!(parse_repo_url(url), Err(Error::InvalidRepoUrl(_))),
                "input should be rejected: {}",
                url
            );
        }
    }

    #[test]
    fn test_raw_base_url() {
        let repo = parsed("octo", "hello", None);
        assert_eq!(
            repo.raw_base_url("main"),
            "https://raw.githubusercontent.com/octo/hello/main/"
        );
    }
}

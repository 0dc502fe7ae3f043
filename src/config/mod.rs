//! Defines the core `Config` struct and related types for application configuration.
//!
//! This module consolidates every setting an analysis needs (credentials, the
//! binary deny-list, output destination, summarization endpoint) into explicit
//! values that are passed to the client, the walker policies and the fetchers.
//! Nothing is read from global state once a `Config` has been built.

use crate::constants::{
    DEFAULT_GITHUB_API, DEFAULT_LLM_API, DEFAULT_LLM_MODEL, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TIMEOUT_SECS,
};
use crate::filtering::DenyList;
use crate::source::RepoRef;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub use builder::ConfigBuilder;
mod builder;
mod validation;

/// Settings for talking to the GitHub API.
#[derive(Clone)]
pub struct GitHubConfig {
    /// Personal access token, handed to the API verbatim as a bearer token.
    pub token: Option<String>,
    /// Base URL of the REST API (`https://api.github.com` or a GitHub Enterprise endpoint).
    pub api_base_url: String,
    /// Branch, tag or commit to read. Overrides any ref in the repository URL.
    pub git_ref: Option<String>,
    /// Timeout for each request.
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: DEFAULT_GITHUB_API.to_string(),
            git_ref: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Custom Debug implementation so tokens never end up in logs.
impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("git_ref", &self.git_ref)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings that control how the tree and the file contents are rendered.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// File-name suffixes treated as binary and never decoded.
    pub deny_list: DenyList,
    /// Sort children by name at each directory level for reproducible output.
    pub sort_entries: bool,
    /// Rewrite relative image paths in the README into raw-content URLs.
    pub rewrite_readme_images: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            deny_list: DenyList::default(),
            sort_entries: false,
            rewrite_readme_images: true,
        }
    }
}

/// Settings for the optional summarization call to an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct LlmConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`. `/chat/completions` is appended.
    pub api_base_url: String,
    /// Bearer token for the endpoint.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Upper bound on generated tokens, if any.
    pub max_tokens: Option<u32>,
    /// System prompt sent before the repository document.
    pub system_prompt: String,
    /// Timeout for the completion request.
    pub timeout: Duration,
}

impl LlmConfig {
    /// Creates a configuration for the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_LLM_API.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            // Summaries of large repositories take a while.
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS * 4),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Represents the destination for the generated output.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum OutputDestination {
    /// Write to standard output.
    Stdout,
    /// Write to the specified file path.
    File(PathBuf),
}

/// Represents the fully resolved configuration for one analysis.
#[derive(Debug, Clone)]
pub struct Config {
    /// The repository URL exactly as the user gave it. Used in the export header.
    pub repo_url: String,
    /// The parsed repository reference.
    pub repo: RepoRef,
    /// Settings for the GitHub API.
    pub github: GitHubConfig,
    /// Settings for rendering the tree and contents.
    pub content: ContentConfig,
    /// Summarization settings. `None` disables the completion call.
    pub summary: Option<LlmConfig>,
    /// Specifies where the final output should be written.
    pub output_destination: OutputDestination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_redacts_secrets() {
        let github = GitHubConfig {
            token: Some("ghp_secret".to_string()),
            ..GitHubConfig::default()
        };
        let debug = format!("{:?}", github);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));

        let llm = LlmConfig::new("sk-secret");
        let debug = format!("{:?}", llm);
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn test_defaults() {
        let github = GitHubConfig::default();
        assert_eq!(github.api_base_url, "https://api.github.com");
        assert_eq!(github.timeout, Duration::from_secs(30));

        let content = ContentConfig::default();
        assert!(!content.sort_entries);
        assert!(content.rewrite_readme_images);
        assert!(content.deny_list.is_denied("logo.png"));
    }
}

// src/config/builder.rs

use super::validation::{validate_http_url, validate_timeout};
use super::{Config, ContentConfig, GitHubConfig, LlmConfig, OutputDestination};
use crate::cli::Cli;
use crate::errors::{Error, Result};
use crate::filtering::DenyList;
use crate::source::parse_repo_url;
use std::path::PathBuf;
use std::time::Duration;

/// A builder for creating a `Config` instance programmatically.
///
/// Every setting is optional except the repository URL. Credentials are taken
/// only from what is passed in here, never from the environment.
///
/// # Examples
///
/// ```
/// use repodigest::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .repo_url("https://github.com/octo/hello")
///     .token("ghp_example")
///     .sort_entries(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.repo.full_name(), "octo/hello");
/// assert!(config.content.sort_entries);
/// assert!(config.summary.is_none());
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    repo_url: Option<String>,
    token: Option<String>,
    api_url: Option<String>,
    git_ref: Option<String>,
    timeout: Option<Duration>,
    extra_deny: Vec<String>,
    sort_entries: Option<bool>,
    rewrite_readme_images: Option<bool>,
    summarize: bool,
    llm_api_key: Option<String>,
    llm_api_url: Option<String>,
    llm_model: Option<String>,
    llm_max_tokens: Option<u32>,
    output_file: Option<String>,
}

impl ConfigBuilder {
    /// Creates a new `ConfigBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated from command-line arguments.
    pub fn from_cli(cli: Cli) -> Self {
        let mut builder = Self {
            repo_url: cli.repo_url,
            token: cli.token,
            api_url: cli.api_url,
            git_ref: cli.git_ref,
            timeout: cli.timeout.map(Duration::from_secs),
            extra_deny: cli.deny.unwrap_or_default(),
            sort_entries: Some(cli.sorted),
            rewrite_readme_images: Some(!cli.no_rewrite_images),
            summarize: cli.summarize,
            llm_api_key: cli.llm_api_key,
            llm_api_url: cli.llm_api_url,
            llm_model: cli.llm_model,
            llm_max_tokens: cli.llm_max_tokens,
            output_file: None,
        };
        if let Some(path) = cli.output_file {
            builder = builder.output_file(path);
        }
        builder
    }

    /// Sets the repository to analyze.
    pub fn repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into());
        self
    }

    /// Sets the GitHub token. An empty string means "no token".
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the GitHub REST API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Sets the branch, tag or commit to read.
    pub fn git_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    /// Sets the per-request timeout for GitHub calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds file-name suffixes to the binary deny-list.
    pub fn deny(mut self, suffixes: Vec<String>) -> Self {
        self.extra_deny.extend(suffixes);
        self
    }

    /// Sorts children by name at each directory level.
    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = Some(sort);
        self
    }

    /// Enables or disables README image-path rewriting.
    pub fn rewrite_readme_images(mut self, rewrite: bool) -> Self {
        self.rewrite_readme_images = Some(rewrite);
        self
    }

    /// Requests a summary from the completion endpoint.
    pub fn summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    /// Sets the completion endpoint's API key.
    pub fn llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    /// Sets the completion endpoint's base URL.
    pub fn llm_api_url(mut self, url: impl Into<String>) -> Self {
        self.llm_api_url = Some(url.into());
        self
    }

    /// Sets the completion model.
    pub fn llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = Some(model.into());
        self
    }

    /// Limits the number of tokens in the summary.
    pub fn llm_max_tokens(mut self, max_tokens: u32) -> Self {
        self.llm_max_tokens = Some(max_tokens);
        self
    }

    /// Writes the output to `path`. An empty string keeps stdout.
    pub fn output_file(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.output_file = if path.is_empty() { None } else { Some(path) };
        self
    }

    /// Builds the summarization settings without the rest of the config.
    ///
    /// Returns `Ok(None)` when no API key is available. Used by the web server,
    /// which summarizes documents independently of any repository.
    pub fn build_llm(&self) -> Result<Option<LlmConfig>> {
        let Some(api_key) = self.llm_api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        let mut llm = LlmConfig::new(api_key);
        if let Some(url) = &self.llm_api_url {
            validate_http_url(url, "completion API URL")?;
            llm.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = &self.llm_model {
            llm.model = model.clone();
        }
        llm.max_tokens = self.llm_max_tokens;
        Ok(Some(llm))
    }

    /// Builds the GitHub settings without the rest of the config.
    pub fn build_github(&self) -> Result<GitHubConfig> {
        let mut github = GitHubConfig {
            token: self.token.clone().filter(|t| !t.trim().is_empty()),
            git_ref: self.git_ref.clone().filter(|r| !r.trim().is_empty()),
            ..GitHubConfig::default()
        };
        if let Some(url) = &self.api_url {
            validate_http_url(url, "GitHub API URL")?;
            github.api_base_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            validate_timeout(timeout)?;
            github.timeout = timeout;
        }
        Ok(github)
    }

    /// Validates the settings and produces a `Config`.
    ///
    /// # Errors
    /// Returns `Error::Config` if no repository URL was given, if a URL is
    /// malformed, or if a summary was requested without an API key, and
    /// `Error::InvalidRepoUrl` if the repository URL cannot be parsed.
    pub fn build(self) -> Result<Config> {
        let repo_url = self
            .repo_url
            .clone()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Config("A repository URL is required.".to_string()))?;
        let repo = parse_repo_url(&repo_url)?;

        let github = self.build_github()?;

        let summary = if self.summarize {
            let llm = self.build_llm()?;
            if llm.is_none() {
                return Err(Error::Config(
                    "Summarizing requires an API key (--llm-api-key or OPENAI_API_KEY)."
                        .to_string(),
                ));
            }
            llm
        } else {
            None
        };

        let mut deny_list = DenyList::default();
        deny_list.extend(self.extra_deny);

        let content = ContentConfig {
            deny_list,
            sort_entries: self.sort_entries.unwrap_or(false),
            rewrite_readme_images: self.rewrite_readme_images.unwrap_or(true),
        };

        let output_destination = match self.output_file {
            Some(path) => OutputDestination::File(PathBuf::from(path)),
            None => OutputDestination::Stdout,
        };

        let config = Config {
            repo_url,
            repo,
            github,
            content,
            summary,
            output_destination,
        };
        log::debug!("Built configuration: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_basic_config_creation() -> Result<()> {
        let config = ConfigBuilder::new().repo_url("octo/hello").build()?;
        assert_eq!(config.repo_url, "octo/hello");
        assert_eq!(config.repo.owner, "octo");
        assert_eq!(config.output_destination, OutputDestination::Stdout);
        assert!(config.github.token.is_none());
        assert!(config.summary.is_none());
        assert!(config.content.rewrite_readme_images);
        Ok(())
    }

    #[test]
    fn test_missing_repo_url_fails() {
        let err = ConfigBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("repository URL is required"));

        let err = ConfigBuilder::new().repo_url("   ").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unparseable_repo_url_fails() {
        let err = ConfigBuilder::new()
            .repo_url("https://gitlab.com/a/b")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRepoUrl(_)));
    }

    #[test]
    fn test_empty_token_means_no_token() -> Result<()> {
        let config = ConfigBuilder::new()
            .repo_url("octo/hello")
            .token("  ")
            .build()?;
        assert!(config.github.token.is_none());
        Ok(())
    }

    #[test]
    fn test_summarize_requires_api_key() {
        let err = ConfigBuilder::new()
            .repo_url("octo/hello")
            .summarize(true)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_summarize_settings() -> Result<()> {
        let config = ConfigBuilder::new()
            .repo_url("octo/hello")
            .summarize(true)
            .llm_api_key("sk-test")
            .llm_api_url("http://localhost:11434/v1/")
            .llm_model("llama3")
            .llm_max_tokens(256)
            .build()?;
        let llm = config.summary.expect("summary config");
        assert_eq!(llm.api_base_url, "http://localhost:11434/v1");
        assert_eq!(llm.model, "llama3");
        assert_eq!(llm.max_tokens, Some(256));
        Ok(())
    }

    #[test]
    fn test_invalid_api_url_and_timeout() {
        let err = ConfigBuilder::new()
            .repo_url("octo/hello")
            .api_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ConfigBuilder::new()
            .repo_url("octo/hello")
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_extra_deny_suffixes() -> Result<()> {
        let config = ConfigBuilder::new()
            .repo_url("octo/hello")
            .deny(vec![".csv".to_string()])
            .build()?;
        assert!(config.content.deny_list.is_denied("data.csv"));
        assert!(config.content.deny_list.is_denied("logo.png"));
        Ok(())
    }

    #[test]
    fn test_from_cli() -> Result<()> {
        let cli = Cli::parse_from([
            "repodigest",
            "https://github.com/octo/hello/tree/dev",
            "--sorted",
            "--no-rewrite-images",
            "--ref",
            "v2",
            "--timeout",
            "5",
            "-o",
            "out.md",
        ]);
        let config = ConfigBuilder::from_cli(cli).build()?;
        assert_eq!(config.repo.git_ref.as_deref(), Some("dev"));
        assert_eq!(config.github.git_ref.as_deref(), Some("v2"));
        assert_eq!(config.github.timeout, Duration::from_secs(5));
        assert!(config.content.sort_entries);
        assert!(!config.content.rewrite_readme_images);
        assert_eq!(
            config.output_destination,
            OutputDestination::File(PathBuf::from("out.md"))
        );
        Ok(())
    }
}

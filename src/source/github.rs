// src/source/github.rs
//! Reads repositories through the GitHub REST Contents API.

use super::url::RepoRef;
use super::RepoSource;
use crate::config::GitHubConfig;
use crate::constants::USER_AGENT as USER_AGENT_VALUE;
use crate::core_types::{DirectoryEntry, FileBlob};
use crate::errors::{Error, Result};
use base64::Engine;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Type of an item in a Contents API listing.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum ItemType {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// Represents a file or directory item from the GitHub Contents API.
#[derive(Deserialize, Debug)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    item_type: ItemType,
    #[serde(default)]
    size: Option<u64>,
    /// Only present when a single file is requested.
    #[serde(default)]
    encoding: Option<String>,
    /// Base64 payload, only present when a single file is requested.
    #[serde(default)]
    content: Option<String>,
}

/// Represents the repository metadata from the GitHub API, only for getting the default branch.
#[derive(Deserialize, Debug)]
struct RepoInfo {
    default_branch: String,
}

/// Error body returned by the GitHub API.
#[derive(Deserialize, Debug)]
struct ApiMessage {
    message: String,
}

/// A [`RepoSource`] backed by the GitHub REST API.
///
/// Construction performs one request for the repository metadata, which
/// validates the credentials and resolves the branch to read from.
#[derive(Debug)]
pub struct GitHubClient {
    client: Client,
    api_base: Url,
    repo: RepoRef,
    branch: String,
}

impl GitHubClient {
    /// Connects to `repo` using the settings in `config`.
    ///
    /// The branch is taken, in order of precedence, from `config.git_ref`, the
    /// ref embedded in the repository URL, or the repository's default branch.
    ///
    /// # Errors
    /// Returns an error if the repository does not exist, access is denied,
    /// or the API cannot be reached.
    ///
    /// # Examples
    /// ```no_run
    /// use repodigest::config::GitHubConfig;
    /// use repodigest::source::{parse_repo_url, GitHubClient, RepoSource};
    ///
    /// # fn main() -> repodigest::errors::Result<()> {
    /// let repo = parse_repo_url("https://github.com/rust-lang/cargo")?;
    /// let client = GitHubClient::connect(repo, &GitHubConfig::default())?;
    /// for entry in client.list_children("")? {
    ///     println!("{}", entry.path());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(repo: RepoRef, config: &GitHubConfig) -> Result<Self> {
        let client = build_reqwest_client(config)?;
        let api_base = Url::parse(&config.api_base_url)
            .map_err(|e| Error::Config(format!("Invalid GitHub API URL: {}", e)))?;

        let mut this = Self {
            client,
            api_base,
            repo,
            branch: String::new(),
        };

        let info = this.fetch_repo_info()?;
        this.branch = if let Some(git_ref) = &config.git_ref {
            log::debug!("Using ref from configuration: {}", git_ref);
            git_ref.clone()
        } else if let Some(git_ref) = &this.repo.git_ref {
            log::debug!("Using ref from URL: {}", git_ref);
            git_ref.clone()
        } else {
            log::debug!("Using default branch: {}", info.default_branch);
            info.default_branch
        };
        log::info!(
            "Reading {} on branch: {}",
            this.repo.full_name(),
            this.branch
        );
        Ok(this)
    }

    /// The branch, tag or commit this client reads.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    fn fetch_repo_info(&self) -> Result<RepoInfo> {
        let url = self.endpoint(&[]);
        log::debug!("Fetching repo metadata from: {}", url);
        let response = self.client.get(url).send()?;
        let response = check_status(response, "")?;
        Ok(response.json()?)
    }

    /// Builds `{api}/repos/{owner}/{repo}[/extra...]`.
    fn endpoint(&self, extra: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", self.repo.owner.as_str(), self.repo.repo.as_str()])
                .extend(extra);
        }
        url
    }

    /// Builds the Contents API URL for `path` at the configured branch.
    fn contents_url(&self, path: &str) -> Url {
        let mut parts = vec!["contents"];
        if path.is_empty() {
            // Root listing: `.../contents/`
            parts.push("");
        } else {
            parts.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        let mut url = self.endpoint(&parts);
        url.query_pairs_mut().append_pair("ref", &self.branch);
        url
    }

    fn get_contents(&self, path: &str) -> Result<Value> {
        let url = self.contents_url(path);
        log::debug!("Fetching contents from: {}", url);
        let response = self.client.get(url).send()?;
        let response = check_status(response, path)?;
        Ok(response.json()?)
    }
}

impl RepoSource for GitHubClient {
    fn list_children(&self, path: &str) -> Result<Vec<DirectoryEntry>> {
        let json_value = self.get_contents(path)?;

        // The API returns a single object if the path is a file, or an array for a directory.
        let items: Vec<ContentItem> = if json_value.is_array() {
            serde_json::from_value(json_value)?
        } else if json_value.is_object() {
            vec![serde_json::from_value(json_value)?]
        } else {
            vec![]
        };

        Ok(items.into_iter().map(into_entry).collect())
    }

    fn fetch_file(&self, path: &str) -> Result<FileBlob> {
        let json_value = self.get_contents(path)?;
        if !json_value.is_object() {
            return Err(Error::Provider {
                path: path.to_string(),
                status: 200,
                message: "expected a file but the path is a directory".to_string(),
            });
        }
        let item: ContentItem = serde_json::from_value(json_value)?;
        decode_item(item)
    }

    fn raw_url_base(&self) -> Option<String> {
        Some(self.repo.raw_base_url(&self.branch))
    }
}

fn into_entry(item: ContentItem) -> DirectoryEntry {
    match item.item_type {
        ItemType::Dir => DirectoryEntry::Directory {
            name: item.name,
            path: item.path,
        },
        ItemType::File | ItemType::Symlink | ItemType::Submodule | ItemType::Other => {
            DirectoryEntry::File {
                name: item.name,
                path: item.path,
                size: item.size,
                blob: None,
            }
        }
    }
}

/// Turns a single-file API response into a [`FileBlob`], removing the base64 transport encoding.
fn decode_item(item: ContentItem) -> Result<FileBlob> {
    let encoding = item.encoding.filter(|e| !e.is_empty());
    let content = item.content.unwrap_or_default();
    match encoding.as_deref() {
        None => Ok(FileBlob::without_encoding()),
        Some(enc) if enc.eq_ignore_ascii_case("none") => Ok(FileBlob {
            encoding,
            data: Vec::new(),
        }),
        Some(enc) if enc.eq_ignore_ascii_case("base64") => {
            // GitHub wraps the payload at 60 columns.
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let data = base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| Error::Provider {
                    path: item.path.clone(),
                    status: 200,
                    message: format!("invalid base64 payload: {}", e),
                })?;
            Ok(FileBlob { encoding, data })
        }
        Some(_) => Ok(FileBlob {
            encoding,
            data: content.into_bytes(),
        }),
    }
}

/// Builds a `reqwest` client with default headers for GitHub API interaction.
fn build_reqwest_client(config: &GitHubConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3+json"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Config("GitHub token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, value);
        log::debug!("Using GitHub token for authentication.");
    }

    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

/// Maps non-success responses to the crate's error variants.
fn check_status(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let message = response
        .json::<ApiMessage>()
        .map(|m| m.message)
        .unwrap_or_else(|_| reason.to_string());
    let path = path.to_string();
    let status = status.as_u16();
    log::debug!("GitHub API returned {} for '{}': {}", status, path, message);
    Err(match status {
        404 => Error::NotFound { path },
        401 | 403 | 429 => Error::Access {
            path,
            status,
            message,
        },
        _ => Error::Provider {
            path,
            status,
            message,
        },
    })
}

// src/constants.rs

/// Header prefix of the export document, followed by the repository URL.
pub const EXPORT_HEADER_PREFIX: &str = "# Analysis of";

/// File name offered for the downloadable export.
pub const EXPORT_FILE_NAME: &str = "repo_analysis.txt";

/// Returned by the README fetcher when no candidate could be decoded.
pub const README_NOT_FOUND: &str = "README not found.";

/// Returned by the LICENSE fetcher when no candidate could be decoded.
pub const LICENSE_NOT_FOUND: &str = "LICENSE not found.";

/// README names probed at the repository root, in order.
pub const README_CANDIDATES: &[&str] = &["README.md", "readme.md", "Readme.md", "README", "readme"];

/// LICENSE names probed at the repository root, in order.
pub const LICENSE_CANDIDATES: &[&str] = &[
    "LICENSE",
    "LICENSE.md",
    "license",
    "license.md",
    "License",
    "License.md",
];

/// Lowercase root-level file names left out of content aggregation because
/// the README/LICENSE fetchers already cover them.
pub const DOC_FILE_NAMES: &[&str] = &["readme", "readme.md", "license", "license.md"];

// --- Inline markers for files that are not rendered ---
pub const MARKER_BINARY: &str = "Skipped binary file";
pub const MARKER_MISSING_ENCODING: &str = "Skipped due to missing encoding";
pub const MARKER_DECODE_FAILED: &str = "Skipped due to encoding issues";
pub const MARKER_ACCESS_ERROR: &str = "Skipped due to access error";

/// Default GitHub REST endpoint.
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Base for raw file URLs used when rewriting README images.
pub const RAW_CONTENT_HOST: &str = "https://raw.githubusercontent.com";

/// User agent sent to every HTTP endpoint (GitHub rejects requests without one).
pub const USER_AGENT: &str = concat!("repodigest/", env!("CARGO_PKG_VERSION"));

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default OpenAI-compatible completion endpoint.
pub const DEFAULT_LLM_API: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// System prompt sent with every summarization request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert software engineer. \
Summarize the following repository: its purpose, main components, how they fit together, \
and anything notable about its build, dependencies or license.";

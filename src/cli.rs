// src/cli.rs

use clap::{Parser, Subcommand};

/// Turns a GitHub repository into a single document ready for an LLM.
///
/// repodigest reads a repository through the GitHub API, fetches its README and
/// LICENSE, walks the whole directory tree and concatenates every text file into
/// one Markdown-flavoured document. Binary formats are skipped by extension.
/// Optionally, the document is sent to an OpenAI-compatible endpoint for a summary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// GitHub repository to analyze (`https://github.com/owner/repo`, `owner/repo`, ...).
    #[arg(value_name = "REPO_URL")]
    pub repo_url: Option<String>,

    // --- GitHub Options ---
    /// GitHub personal access token, sent verbatim as a bearer token.
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API (for GitHub Enterprise).
    #[arg(long = "api-url", global = true, env = "REPODIGEST_GITHUB_API", value_name = "URL")]
    pub api_url: Option<String>,

    /// Read a specific branch, tag or commit instead of the default branch.
    #[arg(long = "ref", alias = "branch", value_name = "BRANCH_OR_TAG")]
    pub git_ref: Option<String>,

    /// Timeout for each GitHub request, in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    // --- Content Options ---
    /// Additional file-name suffixes to treat as binary (repeatable, e.g. `.csv`).
    #[arg(short = 'x', long = "deny", value_name = "SUFFIX", num_args = 1..)]
    pub deny: Option<Vec<String>>,

    /// Sort entries by name at each directory level for reproducible output.
    #[arg(short = 'S', long, action = clap::ArgAction::SetTrue)]
    pub sorted: bool,

    /// Keep relative image paths in the README as they are.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_rewrite_images: bool,

    // --- Summarization Options ---
    /// Send the document to a completion endpoint and append the summary.
    #[arg(short = 's', long, action = clap::ArgAction::SetTrue)]
    pub summarize: bool,

    /// API key for the completion endpoint.
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub llm_api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long, global = true, env = "REPODIGEST_LLM_API", value_name = "URL")]
    pub llm_api_url: Option<String>,

    /// Model used for the summary.
    #[arg(long, global = true, value_name = "MODEL")]
    pub llm_model: Option<String>,

    /// Maximum number of tokens in the summary.
    #[arg(long, global = true, value_name = "TOKENS")]
    pub llm_max_tokens: Option<u32>,

    // --- Output Destination ---
    /// Write output to the specified file instead of stdout.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output_file: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web UI.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Do not open the browser automatically.
        #[arg(long, action = clap::ArgAction::SetTrue)]
        no_open: bool,
    },
}

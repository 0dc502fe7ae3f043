//! `repodigest` is a library and command-line tool that turns a GitHub
//! repository into a single text document ready to feed to a Large Language
//! Model.
//!
//! An analysis has four parts:
//! 1.  **README / LICENSE**: probed at the repository root by name.
//! 2.  **Structure**: one line per entry of the whole tree.
//! 3.  **Contents**: every text file in a fenced block; binaries, undecodable
//!     and unreachable files as inline markers.
//! 4.  **Export**: the sections above combined into one document.
//!
//! The repository is read through the [`source::RepoSource`] trait, so the
//! pipeline runs just as well against the in-memory [`source::MemoryRepo`].
//!
//! # Example: Library Usage
//!
//! ```
//! use repodigest::{analyze, ConfigBuilder};
//! use repodigest::progress::NoOpProgress;
//! use repodigest::source::MemoryRepo;
//!
//! let repo = MemoryRepo::new()
//!     .with_file("a.txt", "hello")
//!     .with_bytes("logo.png", vec![0x89, 0x50, 0x4e, 0x47])
//!     .with_file("sub/b.md", "world");
//!
//! let config = ConfigBuilder::new()
//!     .repo_url("https://github.com/octo/hello")
//!     .sort_entries(true)
//!     .build()
//!     .unwrap();
//!
//! let analysis = analyze(&config, &repo, &NoOpProgress).unwrap();
//! assert_eq!(analysis.structure, "/a.txt\n/logo.png\n/sub/\n/sub/b.md\n");
//! assert!(analysis.contents.contains("File: /logo.png\nContent: Skipped binary file\n\n"));
//!
//! let export = analysis.to_export();
//! assert!(export.starts_with("# Analysis of https://github.com/octo/hello\n\n## README\nREADME not found.\n\n"));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core_types;
pub mod discovery;
pub mod docs;
pub mod errors;
pub mod filtering;
pub mod llm;
pub mod output;
pub mod progress;
pub mod source;
#[cfg(feature = "web")]
pub mod web;

// Re-export key public types for easier use as a library
pub use config::{Config, ConfigBuilder, LlmConfig, OutputDestination};
pub use core_types::{Analysis, DirectoryEntry, FileBlob, FileOutcome};
pub use errors::{Error, Result};

use crate::llm::{summarize_or_message, ChatCompletionsClient};
use crate::output::{structure_line, ContentRenderer};
use crate::progress::ProgressReporter;
use crate::source::{GitHubClient, RepoSource};
use log::{debug, info};

/// Connects to the repository named in `config` through the GitHub API.
///
/// # Errors
/// Fails if the repository does not exist, the token is rejected, or the API
/// cannot be reached.
pub fn connect(config: &Config) -> Result<GitHubClient> {
    GitHubClient::connect(config.repo.clone(), &config.github)
}

/// Runs the README, LICENSE, structure and contents steps against `source`.
///
/// The tree is walked once; each entry feeds both the structure listing and
/// the content aggregation.
///
/// # Errors
/// A failing directory listing aborts the analysis. Per-file problems never
/// do: they are rendered as inline markers.
pub fn analyze(
    config: &Config,
    source: &dyn RepoSource,
    progress: &dyn ProgressReporter,
) -> Result<Analysis> {
    progress.set_message("Fetching README...".to_string());
    let readme = docs::fetch_readme(source, config.content.rewrite_readme_images);
    let license = docs::fetch_license(source);

    progress.set_message("Traversing repository structure...".to_string());
    let renderer = ContentRenderer::new(source, &config.content.deny_list);
    let mut structure = String::new();
    let mut contents = String::new();
    let mut files_seen = false;
    discovery::visit(source, config.content.sort_entries, |prefix, entry| {
        structure.push_str(&structure_line(prefix, entry));
        if !entry.is_dir() && !files_seen {
            files_seen = true;
            progress.set_message("Fetching file contents...".to_string());
        }
        contents.push_str(&renderer.render(prefix, entry));
        progress.inc(1);
    })?;

    debug!(
        "Analysis of {}: {} structure bytes, {} content bytes",
        config.repo_url,
        structure.len(),
        contents.len()
    );
    Ok(Analysis {
        repo_url: config.repo_url.clone(),
        readme,
        license,
        structure,
        contents,
    })
}

/// Summarizes an export document with the configured endpoint.
///
/// Never fails: any problem is returned as `"Summary unavailable: {reason}"`.
pub fn summarize(llm: &LlmConfig, document: &str) -> String {
    match ChatCompletionsClient::new(llm.clone()) {
        Ok(client) => summarize_or_message(&client, document),
        Err(e) => format!("{} {}", crate::llm::SUMMARY_UNAVAILABLE_PREFIX, e),
    }
}

/// Builds the final document for `analysis`, appending a summary when configured.
pub fn render_document(
    config: &Config,
    analysis: &Analysis,
    progress: &dyn ProgressReporter,
) -> String {
    let mut document = analysis.to_export();
    if let Some(llm) = &config.summary {
        progress.set_message("Summarizing...".to_string());
        let summary = summarize(llm, &document);
        output::export::append_summary(&mut document, &summary);
    }
    document
}

/// Executes a complete run: connect, analyze, optionally summarize, write.
///
/// # Errors
/// Returns an error if the repository cannot be read or the output cannot be
/// written.
pub fn run(config: &Config, progress: &dyn ProgressReporter) -> Result<()> {
    info!("Analyzing {}", config.repo.full_name());
    progress.set_message(format!("Connecting to {}...", config.repo.full_name()));
    let client = connect(config)?;
    let analysis = analyze(config, &client, progress)?;
    let document = render_document(config, &analysis, progress);
    progress.finish();
    output::writer::write_document(&config.output_destination, &document)?;
    info!("Done: {}", config.repo_url);
    Ok(())
}

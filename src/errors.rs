//! Defines application-specific error types.
//!
//! This module provides the `Error` enum, which categorizes the failures that
//! abort an analysis. Per-file problems are not errors: they are reported as
//! [`crate::core_types::FileOutcome`] values and rendered inline.

use thiserror::Error;

/// Application-specific errors used throughout `repodigest`.
#[derive(Error, Debug)]
pub enum Error {
    // --- Configuration Errors ---
    /// Generic error related to invalid configuration settings or combinations.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The repository URL could not be understood.
    #[error("Could not parse a GitHub repository from '{0}'")]
    InvalidRepoUrl(String),

    // --- Provider Errors ---
    /// The provider reported that a path (or the repository itself) does not exist.
    #[error("Not found: '{path}'")]
    NotFound {
        /// The repository path that was requested.
        path: String,
    },

    /// The provider refused the request (bad credentials, missing scope, rate limit).
    #[error("Access denied for '{path}' (HTTP {status}): {message}")]
    Access {
        /// The repository path that was requested.
        path: String,
        /// HTTP status code returned by the provider.
        status: u16,
        /// Message returned by the provider.
        message: String,
    },

    /// Any other non-success response from the provider.
    #[error("Provider error for '{path}' (HTTP {status}): {message}")]
    Provider {
        /// The repository path that was requested.
        path: String,
        /// HTTP status code returned by the provider.
        status: u16,
        /// Message returned by the provider.
        message: String,
    },

    /// Transport-level failure talking to the provider.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a body that could not be interpreted.
    #[error("Unexpected response from provider: {0}")]
    Json(#[from] serde_json::Error),

    // --- I/O Errors ---
    /// Error occurring while writing the output.
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },
}

/// A `Result` alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` for errors that mean "this path does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Helper function to create an `Error::Io` with path context.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}

// src/config/validation.rs

use crate::errors::{Error, Result};
use std::time::Duration;
use url::Url;

/// Checks that `value` is an absolute `http` or `https` URL.
pub(super) fn validate_http_url(value: &str, what: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", what, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "Invalid {} '{}': unsupported scheme '{}'",
            what, value, other
        ))),
    }
}

/// Rejects a zero timeout, which reqwest would treat as "fail immediately".
pub(super) fn validate_timeout(timeout: Duration) -> Result<()> {
    if timeout.is_zero() {
        return Err(Error::Config("Timeout must be greater than zero.".to_string()));
    }
    Ok(())
}

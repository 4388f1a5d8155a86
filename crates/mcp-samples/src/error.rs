//! Typed errors for the library side of the samples.
//!
//! Binaries wrap these in `anyhow` with context; the variants exist so tests
//! and callers can tell a missing server apart from a disabled one, or a
//! transport failure apart from a rejected request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("MCP server configuration not found: {0}")]
    ServerNotFound(String),
    #[error("MCP server is disabled: {0}")]
    ServerDisabled(String),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

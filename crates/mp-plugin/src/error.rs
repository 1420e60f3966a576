//! Runner error types.

use std::io;

/// Boxed error returned by a plugin's fetch.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced while running a plugin.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to fetch metrics: {0}")]
    Fetch(#[source] FetchError),
}

//! Error types for monitor agent scraping.

use thiserror::Error;

/// Result type alias for scrape operations.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Errors that can occur while scraping the monitor agent.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The configured endpoint URL could not be used.
    #[error("invalid endpoint: {0}")]
    Endpoint(String),

    /// Connection failure, request failure, timeout, or non-2xx status.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The response body was not a valid plugin document.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

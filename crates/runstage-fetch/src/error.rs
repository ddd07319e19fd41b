//! Fetch error types

use std::path::PathBuf;
use thiserror::Error;

/// Failures while retrieving a resource
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection or transfer failure
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Download of {url} failed with status: {status}")]
    Status { url: String, status: u16 },

    /// Writing the body to disk failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

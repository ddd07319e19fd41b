//! Extraction error types

use std::path::PathBuf;
use thiserror::Error;

/// Failures while unpacking an archive
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No native unpacker for this file
    #[error("Unsupported archive format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Archive file does not exist
    #[error("Archive not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Corrupt or unreadable zip archive
    #[error("Invalid or corrupt ZIP: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error during native extraction
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fallback tool could not be started
    #[error("Failed to run {tool}: {source}")]
    FallbackSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Fallback tool ran and reported failure
    #[error("{tool} failed ({status}): {stderr}")]
    FallbackFailed {
        tool: String,
        status: String,
        stderr: String,
    },
}

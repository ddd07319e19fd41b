//! Error types for materialization and reporting
//!
//! Everything here is fatal to a run. Recoverable problems (a failed
//! download, an archive neither unpacker could handle) are logged by the
//! materializer and never surface as an `Error`.

use runstage_fetch::FetchError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using runstage-materialize's Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Code record without a source URL
    #[error("Code entry #{index} has no url; code cannot be materialized without a source")]
    MissingCodeUrl { index: usize },

    /// Code record whose filepath is not an archive
    #[error("Code {url} is not an archive (filepath: {filepath})")]
    CodeNotArchive { url: String, filepath: String },

    /// Code download failed
    #[error("Failed to download code from {url}: {source}")]
    CodeUnavailable {
        url: String,
        #[source]
        source: FetchError,
    },

    /// Importing a local output file failed
    #[error("Failed to import local output {}: {source}", path.display())]
    LocalOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be serialized
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Report could not be written
    #[error("Failed to write report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be read
    #[error("Failed to read report {}: {source}", path.display())]
    ReportRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report is not valid JSON
    #[error("Failed to parse report {}: {source}", path.display())]
    ReportParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Report is valid JSON but not a metadata report
    #[error("Malformed report {}: {reason}", path.display())]
    ReportMalformed { path: PathBuf, reason: String },
}

impl Error {
    /// Create a malformed report error
    pub fn report_malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ReportMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

//! Error types for runstage-core

use thiserror::Error;

/// Result type alias using runstage-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for runstage
#[derive(Error, Debug)]
pub enum Error {
    /// Metadata document not found
    #[error("Metadata file not found: {path}")]
    MetadataNotFound { path: String },

    /// Metadata document could not be interpreted
    #[error("Invalid metadata document: {message}")]
    InvalidMetadata { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a metadata not found error
    pub fn metadata_not_found(path: impl Into<String>) -> Self {
        Self::MetadataNotFound { path: path.into() }
    }

    /// Create an invalid metadata error
    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Render an error followed by every cause in its `source()` chain.
///
/// Causes whose text is already part of the message are skipped, so errors
/// that embed their source in `Display` are not repeated.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

//! # runstage-core
//!
//! Core library for runstage providing:
//! - Run metadata document types (resource records, workflow, sections)
//! - Error types shared across the workspace
//! - Runtime configuration with hierarchical loading
//! - Workdir-relative path resolution

pub mod config;
pub mod error;
pub mod types;
pub mod workspace;

pub use config::HierarchicalConfigLoader;
pub use error::{error_chain, Error, Result};
pub use types::{MetadataDocument, ResourceRecord, RunMetadata, RuntimeConfig, Section};
pub use workspace::Workspace;

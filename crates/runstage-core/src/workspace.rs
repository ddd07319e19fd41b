//! Workdir-relative path handling
//!
//! Record paths in the metadata are written relative to the run's workdir.
//! `Workspace` turns them into filesystem paths for I/O and turns discovered
//! filesystem paths back into the workdir-relative form stored in reports.

use std::path::{Path, PathBuf};

/// Root directory that record paths are resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of a record path. Absolute paths are kept as-is.
    pub fn resolve(&self, record_path: &str) -> PathBuf {
        self.root.join(record_path)
    }

    /// Record form of a filesystem path: relative to the root when it lies
    /// under it, unchanged otherwise.
    pub fn relativize(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }
}

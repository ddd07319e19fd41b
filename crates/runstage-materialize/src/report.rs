//! Report writing

use crate::error::{Error, Result};
use runstage_core::types::ReportConfig;
use runstage_core::{MetadataDocument, Workspace};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Writes the materialized metadata as a pretty-printed JSON report
#[derive(Debug, Clone)]
pub struct ReportWriter {
    filename: String,
    indent: usize,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

impl ReportWriter {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            filename: config.filename.clone(),
            indent: config.indent,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Location of the report for a given workspace
    pub fn report_path(&self, workspace: &Workspace) -> PathBuf {
        workspace.root().join(&self.filename)
    }

    /// Serialize `document` to bytes
    pub fn render(&self, document: &MetadataDocument) -> Result<Vec<u8>> {
        let indent = " ".repeat(self.indent);
        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
        document.serialize(&mut serializer)?;
        Ok(buffer)
    }

    /// Write the report under the workspace root and return its path.
    pub fn write(&self, document: &MetadataDocument, workspace: &Workspace) -> Result<PathBuf> {
        let path = self.report_path(workspace);
        let content = self.render(document)?;

        let write_error = |source| Error::ReportWrite {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(workspace.root()).map_err(write_error)?;
        fs::write(&path, content).map_err(write_error)?;

        info!("Report written to {}", path.display());
        Ok(path)
    }
}

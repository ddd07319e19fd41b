//! Run metadata document
//!
//! The document on disk has the shape:
//!
//! ```json
//! {
//!   "Metadata": {
//!     "id": "...",
//!     "workdir": "/path/to/workdir",
//!     "workflow": { "run": { ... }, "data": { ... } },
//!     "run": { "inputs": [ ... ], "outputs": [ ... ], "code": [ ... ] }
//!   }
//! }
//! ```
//!
//! Fields runstage does not interpret are preserved at every level.

use crate::error::{Error, Result};
use crate::types::ResourceRecord;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Top-level metadata document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(rename = "Metadata")]
    pub metadata: RunMetadata,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataDocument {
    /// Load a metadata document from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::metadata_not_found(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a metadata document from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(content)?;
        if document.metadata.workdir.trim().is_empty() {
            return Err(Error::invalid_metadata("Metadata.workdir must not be empty"));
        }
        Ok(document)
    }
}

/// The run description: workdir, workflow files and the three record sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Opaque run identifier, only used when reporting regression results.
    /// Absent stays absent; an explicit `null` is kept.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,

    pub workdir: String,

    #[serde(default)]
    pub workflow: Workflow,

    #[serde(default)]
    pub run: RunSections,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunMetadata {
    /// Records of one section
    pub fn section(&self, section: Section) -> &Vec<ResourceRecord> {
        match section {
            Section::Inputs => &self.run.inputs,
            Section::Outputs => &self.run.outputs,
            Section::Code => &self.run.code,
        }
    }

    /// Mutable records of one section
    pub fn section_mut(&mut self, section: Section) -> &mut Vec<ResourceRecord> {
        match section {
            Section::Inputs => &mut self.run.inputs,
            Section::Outputs => &mut self.run.outputs,
            Section::Code => &mut self.run.code,
        }
    }
}

/// Workflow definition files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default)]
    pub run: ResourceRecord,

    #[serde(default)]
    pub data: ResourceRecord,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Record collections of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSections {
    #[serde(default)]
    pub inputs: Vec<ResourceRecord>,

    #[serde(default)]
    pub outputs: Vec<ResourceRecord>,

    #[serde(default)]
    pub code: Vec<ResourceRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The three record sections, in processing order
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Inputs,
    Outputs,
    Code,
}

impl Section {
    /// All sections in the order they are materialized
    pub const ALL: [Section; 3] = [Section::Inputs, Section::Outputs, Section::Code];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Inputs => "inputs",
            Section::Outputs => "outputs",
            Section::Code => "code",
        }
    }

    /// Whether `filename`/`size` are filled in after a successful download.
    /// Inputs are left as declared.
    pub fn backfills_after_fetch(&self) -> bool {
        !matches!(self, Section::Inputs)
    }

    /// Whether `path` is rewritten to `filepath` once the section is done
    pub fn addresses_by_filepath(&self) -> bool {
        matches!(self, Section::Outputs)
    }

    /// Whether every record must be a downloadable archive
    pub fn requires_archived_source(&self) -> bool {
        matches!(self, Section::Code)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

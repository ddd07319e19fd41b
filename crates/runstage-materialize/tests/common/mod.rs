//! Common test infrastructure for runstage-materialize tests
//!
//! - `StaticFetcher`: in-memory `ResourceFetcher` that records every request
//! - archive builders for zip fixtures
//! - metadata document builders

#![allow(dead_code)]

use async_trait::async_trait;
use runstage_archive::{ArchiveExtractor, FallbackTool};
use runstage_core::{MetadataDocument, ResourceRecord, Workspace};
use runstage_fetch::{FetchError, ResourceFetcher};
use runstage_materialize::Materializer;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Serves fixed bodies by URL; unknown URLs answer 404
#[derive(Clone, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    /// Handle to the list of requested URLs, usable after the fetcher is boxed
    pub fn requests(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl ResourceFetcher for StaticFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self.bodies.get(url).ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|source| FetchError::Write {
                path: dest.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(dest, body).map_err(|source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(body.len() as u64)
    }
}

/// Extractor whose fallback tool never exists, so only native unpacking works
pub fn native_only_extractor() -> ArchiveExtractor {
    ArchiveExtractor::new(FallbackTool::new(
        "runstage-test-no-such-unpacker",
        vec!["-overwrite".to_string(), "unarchive".to_string()],
    ))
}

pub fn materializer(workdir: &Path, fetcher: StaticFetcher) -> Materializer {
    Materializer::new(
        Workspace::new(workdir),
        Box::new(fetcher),
        native_only_extractor(),
    )
}

/// Build a zip archive in memory
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn record(url: Option<&str>, filepath: Option<&str>, path: Option<&str>) -> Value {
    json!({
        "url": url,
        "path": path,
        "filepath": filepath,
        "hash": null,
        "filename": null,
        "size": null
    })
}

pub fn empty_record() -> Value {
    record(None, None, None)
}

/// Metadata document with the given sections and empty workflow files
pub fn document(workdir: &Path, inputs: Value, outputs: Value, code: Value) -> MetadataDocument {
    let value = json!({
        "Metadata": {
            "id": "test-run",
            "workdir": workdir.to_string_lossy(),
            "workflow": { "run": empty_record(), "data": empty_record() },
            "run": { "inputs": inputs, "outputs": outputs, "code": code }
        }
    });
    MetadataDocument::from_json(&value.to_string()).unwrap()
}

/// Records sorted by filepath, for order-independent comparison
pub fn sorted_filepaths(records: &[ResourceRecord]) -> Vec<String> {
    let mut paths: Vec<String> = records
        .iter()
        .filter_map(|r| r.filepath.clone())
        .collect();
    paths.sort();
    paths
}

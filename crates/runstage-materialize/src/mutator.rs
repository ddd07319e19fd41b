//! Metadata materialization
//!
//! Each section (`inputs`, `outputs`, `code`) goes through a fixed sequence of
//! full passes. Every pass finishes for all records before the next starts:
//!
//! 1. fetch every record that has both `url` and `filepath`
//! 2. extract every record whose `filepath` classifies as an archive into its
//!    `path`, which then names the extraction directory
//! 3. collect the files found under each extraction directory, leaving out
//!    the archives themselves
//! 4. append the collected records to the section
//! 5. prune the archive records they replace
//! 6. (outputs only) set every record's `path` to its `filepath`
//!
//! Code records are checked up front: each must have a `url` and an archive
//! `filepath`, and a failed code download aborts the run. Every other failure
//! is logged and the record is left partially populated.

use crate::error::{Error, Result};
use crate::fingerprint::ContentHasher;
use crate::local::import_local_output;
use runstage_archive::{collect_files, is_archive, ArchiveExtractor};
use runstage_core::{error_chain, ResourceRecord, RunMetadata, Section, Workspace};
use runstage_fetch::ResourceFetcher;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counters for one processed section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSummary {
    pub fetched: usize,
    pub fetch_failures: usize,
    pub extracted: usize,
    pub extraction_failures: usize,
    pub discovered: usize,
    pub pruned: usize,
}

/// Outcome of a full materialization
#[derive(Debug, Clone, Default)]
pub struct MaterializeSummary {
    /// Workflow files (run/data) downloaded successfully
    pub workflow_fetched: usize,

    /// Per-section counters, in processing order
    pub sections: Vec<(Section, SectionSummary)>,

    /// Records that received a content hash
    pub hashed: usize,
}

impl MaterializeSummary {
    pub fn section(&self, section: Section) -> Option<&SectionSummary> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, summary)| summary)
    }
}

/// Orchestrates fetching, extraction and discovery over a run's metadata
pub struct Materializer {
    workspace: Workspace,
    fetcher: Box<dyn ResourceFetcher>,
    extractor: ArchiveExtractor,
    hasher: Option<Box<dyn ContentHasher>>,
    local_outputs: Option<PathBuf>,
}

impl Materializer {
    pub fn new(
        workspace: Workspace,
        fetcher: Box<dyn ResourceFetcher>,
        extractor: ArchiveExtractor,
    ) -> Self {
        Self {
            workspace,
            fetcher,
            extractor,
            hasher: None,
            local_outputs: None,
        }
    }

    /// Import a locally produced file into `outputs` before they are processed
    pub fn with_local_outputs(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_outputs = Some(path.into());
        self
    }

    /// Fill `hash` for every record with a file on disk once materialized
    pub fn with_hasher(mut self, hasher: Box<dyn ContentHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Materialize `metadata` in place.
    pub async fn materialize(&self, metadata: &mut RunMetadata) -> Result<MaterializeSummary> {
        validate_code(&metadata.run.code)?;

        let mut summary = MaterializeSummary::default();

        if self.fetch_workflow_file("run", &mut metadata.workflow.run).await {
            summary.workflow_fetched += 1;
        }
        if self.fetch_workflow_file("data", &mut metadata.workflow.data).await {
            summary.workflow_fetched += 1;
        }

        for section in Section::ALL {
            if section == Section::Outputs {
                if let Some(local) = &self.local_outputs {
                    if let Some(record) = import_local_output(local, &self.workspace)? {
                        metadata.run.outputs.push(record);
                    }
                }
            }

            let section_summary = self
                .process_section(section, metadata.section_mut(section))
                .await?;
            info!(
                "{}: {} fetched, {} extracted, {} discovered, {} archives pruned",
                section,
                section_summary.fetched,
                section_summary.extracted,
                section_summary.discovered,
                section_summary.pruned
            );
            summary.sections.push((section, section_summary));
        }

        if let Some(hasher) = &self.hasher {
            summary.hashed = self.fingerprint(hasher.as_ref(), metadata);
        }

        Ok(summary)
    }

    /// Download a workflow file; its `path` then names the file itself.
    async fn fetch_workflow_file(&self, label: &str, record: &mut ResourceRecord) -> bool {
        let Some((url, filepath)) = owned_fetch_target(record) else {
            debug!("Workflow {} file has nothing to download", label);
            return false;
        };

        let result = self
            .fetcher
            .fetch(&url, &self.workspace.resolve(&filepath))
            .await;
        let fetched = match result {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    "Failed to download workflow {} file: {}",
                    label,
                    error_chain(&e)
                );
                false
            }
        };
        record.path = Some(filepath);
        fetched
    }

    async fn process_section(
        &self,
        section: Section,
        records: &mut Vec<ResourceRecord>,
    ) -> Result<SectionSummary> {
        let mut summary = SectionSummary::default();
        debug!("Processing {} ({} records)", section, records.len());

        // Fetch
        for record in records.iter_mut() {
            let Some((url, filepath)) = owned_fetch_target(record) else {
                continue;
            };
            let dest = self.workspace.resolve(&filepath);

            let result = self.fetcher.fetch(&url, &dest).await;
            match result {
                Ok(_) => {
                    summary.fetched += 1;
                    if section.backfills_after_fetch() {
                        backfill(record, &dest);
                    }
                }
                Err(source) if section.requires_archived_source() => {
                    return Err(Error::CodeUnavailable { url, source });
                }
                Err(e) => {
                    summary.fetch_failures += 1;
                    warn!("Failed to download {}: {}", url, error_chain(&e));
                }
            }
        }

        // Classify once; filepaths do not change below
        let archived: Vec<bool> = records
            .iter()
            .map(|r| r.filepath().is_some_and(|fp| is_archive(fp)))
            .collect();

        // Extract
        for (record, _) in records.iter_mut().zip(&archived).filter(|(_, a)| **a) {
            let Some(filepath) = record.filepath().map(str::to_string) else {
                continue;
            };
            let dest = record
                .path()
                .map(str::to_string)
                .unwrap_or_else(|| default_extraction_dir(&filepath));

            let result = self
                .extractor
                .extract(
                    &self.workspace.resolve(&filepath),
                    &self.workspace.resolve(&dest),
                )
                .await;
            match result {
                Ok(_) => {
                    summary.extracted += 1;
                    record.path = Some(dest);
                }
                Err(e) => {
                    summary.extraction_failures += 1;
                    warn!("Unable to extract {}: {}", filepath, error_chain(&e));
                    record.path = None;
                }
            }
        }

        // Collect
        let mut discovered = Vec::new();
        for (record, _) in records.iter().zip(&archived).filter(|(_, a)| **a) {
            match record.path() {
                Some(dir) => {
                    discovered.extend(collect_files(&self.workspace.resolve(dir), &self.workspace))
                }
                None => debug!(
                    "No extraction directory for {:?}, nothing to collect",
                    record.filepath
                ),
            }
        }

        // An archive downloaded into its own extraction directory is not content
        let archive_paths: Vec<&str> = records
            .iter()
            .zip(&archived)
            .filter(|(_, a)| **a)
            .filter_map(|(r, _)| r.filepath())
            .collect();
        discovered.retain(|r| !r.filepath().is_some_and(|fp| archive_paths.contains(&fp)));
        summary.discovered = discovered.len();

        // Append and prune into a fresh list
        let original = std::mem::take(records);
        let before = original.len();
        let mut materialized: Vec<ResourceRecord> = original
            .into_iter()
            .zip(archived)
            .filter(|(record, was_archive)| !*was_archive || discovered.contains(record))
            .map(|(record, _)| record)
            .collect();
        summary.pruned = before - materialized.len();
        materialized.extend(discovered);

        if section.addresses_by_filepath() {
            for record in &mut materialized {
                record.path = record.filepath.clone();
            }
        }

        *records = materialized;
        Ok(summary)
    }

    fn fingerprint(&self, hasher: &dyn ContentHasher, metadata: &mut RunMetadata) -> usize {
        let workflow = [&mut metadata.workflow.run, &mut metadata.workflow.data];
        let sections = metadata
            .run
            .inputs
            .iter_mut()
            .chain(metadata.run.outputs.iter_mut())
            .chain(metadata.run.code.iter_mut());

        let mut hashed = 0;
        for record in workflow.into_iter().chain(sections) {
            let Some(filepath) = record.filepath() else {
                continue;
            };
            let file = self.workspace.resolve(filepath);
            if !file.is_file() {
                continue;
            }
            match hasher.hash_file(&file) {
                Ok(digest) => {
                    record.hash = Some(digest);
                    hashed += 1;
                }
                Err(e) => warn!(
                    "Failed to compute {} for {}: {}",
                    hasher.algorithm(),
                    file.display(),
                    e
                ),
            }
        }
        hashed
    }
}

/// Reject code records that cannot be materialized, before anything is fetched
pub fn validate_code(code: &[ResourceRecord]) -> Result<()> {
    for (index, record) in code.iter().enumerate() {
        let Some(url) = record.url() else {
            return Err(Error::MissingCodeUrl { index });
        };
        if !record.filepath().is_some_and(|fp| is_archive(fp)) {
            return Err(Error::CodeNotArchive {
                url: url.to_string(),
                filepath: record.filepath.clone().unwrap_or_default(),
            });
        }
    }
    Ok(())
}

fn owned_fetch_target(record: &ResourceRecord) -> Option<(String, String)> {
    record
        .fetch_target()
        .map(|(url, filepath)| (url.to_string(), filepath.to_string()))
}

/// Fill `filename` and `size` from the downloaded file
fn backfill(record: &mut ResourceRecord, file: &Path) {
    record.filename = record.basename();
    match fs::metadata(file) {
        Ok(metadata) => record.size = Some(metadata.len()),
        Err(e) => warn!("Failed to stat {}: {}", file.display(), e),
    }
}

/// Extraction target for an archive record without a `path`: the directory
/// holding the archive
fn default_extraction_dir(filepath: &str) -> String {
    Path::new(filepath)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| ".".to_string())
}

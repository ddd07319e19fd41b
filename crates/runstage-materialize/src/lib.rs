//! Run metadata materialization
//!
//! Turns a run metadata document into files on disk and a report describing
//! what was actually found there:
//!
//! - [`Materializer`] runs the fetch, extract, collect, append and prune
//!   passes over each section and rewrites the metadata in place
//! - [`ReportWriter`] persists the result as pretty-printed JSON
//! - [`compare_reports`] checks a report against a reference for regression
//!   testing
//!
//! # Example
//!
//! ```no_run
//! use runstage_archive::ArchiveExtractor;
//! use runstage_core::{MetadataDocument, Workspace};
//! use runstage_core::types::NetworkConfig;
//! use runstage_fetch::HttpFetcher;
//! use runstage_materialize::{Materializer, ReportWriter};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut document = MetadataDocument::from_path(Path::new("run.json"))?;
//! let workspace = Workspace::new(&document.metadata.workdir);
//! let fetcher = HttpFetcher::new(&NetworkConfig::default())?;
//!
//! Materializer::new(workspace.clone(), Box::new(fetcher), ArchiveExtractor::default())
//!     .materialize(&mut document.metadata)
//!     .await?;
//!
//! let report = ReportWriter::default().write(&document, &workspace)?;
//! println!("Report written to {}", report.display());
//! # Ok(())
//! # }
//! ```

pub mod compare;
pub mod error;
pub mod fingerprint;
pub mod local;
pub mod mutator;
pub mod report;

pub use compare::{compare_reports, Comparison};
pub use error::{Error, Result};
pub use fingerprint::{ContentHasher, Sha256Hasher};
pub use mutator::{MaterializeSummary, Materializer, SectionSummary};
pub use report::ReportWriter;

//! Regression comparison of reports
//!
//! Two reports are equivalent when their sorted top-level key sets are equal.
//! Values, nested content and array order are not inspected.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Outcome of comparing a candidate report with a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Key sets match; carries the candidate's run id
    Match { id: String },

    /// Key sets differ
    Mismatch {
        candidate_keys: Vec<String>,
        reference_keys: Vec<String>,
    },
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match { .. })
    }
}

/// Compare the report at `candidate` against the one at `reference`.
pub fn compare_reports(candidate: &Path, reference: &Path) -> Result<Comparison> {
    let candidate_report = load_report(candidate)?;
    let reference_report = load_report(reference)?;

    let candidate_keys = sorted_keys(&candidate_report, candidate)?;
    let reference_keys = sorted_keys(&reference_report, reference)?;
    debug!(
        "Comparing keys {:?} against {:?}",
        candidate_keys, reference_keys
    );

    if candidate_keys != reference_keys {
        return Ok(Comparison::Mismatch {
            candidate_keys,
            reference_keys,
        });
    }

    let id = candidate_report
        .pointer("/Metadata/id")
        .map(display_id)
        .ok_or_else(|| Error::report_malformed(candidate, "missing Metadata.id"))?;

    Ok(Comparison::Match { id })
}

fn load_report(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|source| Error::ReportRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::ReportParse {
        path: path.to_path_buf(),
        source,
    })
}

fn sorted_keys(report: &Value, path: &Path) -> Result<Vec<String>> {
    let object = report
        .as_object()
        .ok_or_else(|| Error::report_malformed(path, "top level is not a JSON object"))?;
    let mut keys: Vec<String> = object.keys().cloned().collect();
    keys.sort();
    Ok(keys)
}

fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Compare command

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use runstage_materialize::{compare_reports, Comparison};
use std::path::Path;

use crate::output;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Report under test
    pub candidate: Utf8PathBuf,

    /// Reference report
    pub reference: Utf8PathBuf,
}

pub fn run(args: CompareArgs) -> Result<()> {
    check_regression(args.candidate.as_std_path(), args.reference.as_std_path())
}

/// Compare two reports and fail when their top-level keys differ
pub fn check_regression(candidate: &Path, reference: &Path) -> Result<()> {
    let comparison = compare_reports(candidate, reference).with_context(|| {
        format!(
            "Failed to compare {} with {}",
            candidate.display(),
            reference.display()
        )
    })?;

    match comparison {
        Comparison::Match { id } => {
            output::success(&format!("Regression test SUCCESS for {}", id));
            Ok(())
        }
        Comparison::Mismatch {
            candidate_keys,
            reference_keys,
        } => {
            output::error("Regression test FAILED: top-level keys differ");
            output::kv("candidate", &candidate_keys.join(", "));
            output::kv("reference", &reference_keys.join(", "));
            bail!(
                "{} does not match reference {}",
                candidate.display(),
                reference.display()
            )
        }
    }
}

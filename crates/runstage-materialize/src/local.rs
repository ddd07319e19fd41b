//! Import of a locally produced output file into the run's outputs

use crate::error::{Error, Result};
use runstage_core::{ResourceRecord, Workspace};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Directory under the workdir that receives imported outputs
pub const OUTPUTS_DIR: &str = "outputs";

/// Copy `local` into `<workdir>/outputs/` and describe it as an output record.
///
/// Returns `Ok(None)` when `local` does not exist; that is logged and the run
/// continues. A failing copy is fatal.
pub fn import_local_output(local: &Path, workspace: &Workspace) -> Result<Option<ResourceRecord>> {
    if !local.is_file() {
        warn!(
            "Local outputs do not exist, check path {}",
            local.display()
        );
        return Ok(None);
    }

    let Some(basename) = local.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        warn!("Local output {} has no file name", local.display());
        return Ok(None);
    };
    let stem = basename.split('.').next().unwrap_or(&basename).to_string();

    let filepath = format!("{}/{}", OUTPUTS_DIR, basename);
    let dest = workspace.resolve(&filepath);
    let local_error = |source| Error::LocalOutput {
        path: local.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(local_error)?;
    }
    let size = fs::copy(local, &dest).map_err(local_error)?;
    info!("Imported local output {} as {}", local.display(), filepath);

    Ok(Some(ResourceRecord {
        url: None,
        path: Some(format!("{}/{}", OUTPUTS_DIR, stem)),
        filepath: Some(filepath),
        hash: None,
        filename: Some(basename),
        size: Some(size),
        extra: Default::default(),
    }))
}

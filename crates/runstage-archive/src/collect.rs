//! Recursive discovery of extracted files

use runstage_core::{error_chain, ResourceRecord, Workspace};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Walk `root` and describe every regular file below it.
///
/// Each record has no `url`, `path` set to the containing directory and
/// `filepath` set to the file itself, both in workdir-relative form. Entries
/// come in the filesystem's native order; sort by `filepath` when comparing.
///
/// Any enumeration error (missing root, permission denied) yields an empty
/// list and a warning instead of failing the run.
pub fn collect_files(root: &Path, workspace: &Workspace) -> Vec<ResourceRecord> {
    if !root.is_dir() {
        warn!("Cannot collect files: {} is not a directory", root.display());
        return Vec::new();
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to walk {}: {}", root.display(), error_chain(&e));
                return Vec::new();
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Failed to read metadata for {}: {}", entry.path().display(), e);
                return Vec::new();
            }
        };

        let containing_dir = entry.path().parent().unwrap_or(root);
        records.push(ResourceRecord::discovered(
            workspace.relativize(containing_dir),
            workspace.relativize(entry.path()),
            entry.file_name().to_string_lossy(),
            size,
        ));
    }

    debug!("Collected {} files under {}", records.len(), root.display());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("code/lib/deep")).unwrap();
        fs::write(root.join("code/run.py"), "print('hi')").unwrap();
        fs::write(root.join("code/lib/util.py"), "x = 1").unwrap();
        fs::write(root.join("code/lib/deep/data.bin"), [0u8; 16]).unwrap();
    }

    fn sorted(mut records: Vec<ResourceRecord>) -> Vec<ResourceRecord> {
        records.sort_by(|a, b| a.filepath.cmp(&b.filepath));
        records
    }

    #[test]
    fn test_collects_nested_files() {
        let temp = TempDir::new().unwrap();
        populate(temp.path());
        let workspace = Workspace::new(temp.path());

        let records = sorted(collect_files(&temp.path().join("code"), &workspace));

        let filepaths: Vec<_> = records.iter().filter_map(|r| r.filepath()).collect();
        assert_eq!(
            filepaths,
            vec!["code/lib/deep/data.bin", "code/lib/util.py", "code/run.py"]
        );

        let data = &records[0];
        assert_eq!(data.path(), Some("code/lib/deep"));
        assert_eq!(data.filename.as_deref(), Some("data.bin"));
        assert_eq!(data.size, Some(16));
        assert!(data.url.is_none());
        assert!(data.hash.is_none());

        assert_eq!(records[2].path(), Some("code"));
        assert_eq!(records[2].size, Some(11));
    }

    #[test]
    fn test_collection_is_idempotent() {
        let temp = TempDir::new().unwrap();
        populate(temp.path());
        let workspace = Workspace::new(temp.path());
        let root = temp.path().join("code");

        let first = sorted(collect_files(&root, &workspace));
        let second = sorted(collect_files(&root, &workspace));
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path());
        assert!(collect_files(&temp.path().join("absent"), &workspace).is_empty());
    }

    #[test]
    fn test_file_root_yields_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("single.txt"), "x").unwrap();
        let workspace = Workspace::new(temp.path());
        assert!(collect_files(&temp.path().join("single.txt"), &workspace).is_empty());
    }

    #[test]
    fn test_paths_outside_workspace_stay_absolute() {
        let data = TempDir::new().unwrap();
        fs::write(data.path().join("a.txt"), "abc").unwrap();
        let workspace = Workspace::new("/some/other/workdir");

        let records = collect_files(data.path(), &workspace);
        assert_eq!(records.len(), 1);
        let expected = data.path().join("a.txt");
        assert_eq!(records[0].filepath(), Some(expected.to_str().unwrap()));
    }
}

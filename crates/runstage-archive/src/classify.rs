//! Archive classification by file extension
//!
//! Classification is purely syntactic: the file is never opened. A path is an
//! archive when the suffix after its last `.` matches the final segment of an
//! extension in [`UNPACK_FORMATS`]. This accepts some false positives (a bare
//! `.gz` file classifies as an archive) in exchange for zero I/O.

use std::path::Path;

/// A registered unpack format and the extensions that select it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackFormat {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub description: &'static str,
}

/// Formats the extractor knows about, natively or through the fallback tool
pub const UNPACK_FORMATS: &[UnpackFormat] = &[
    UnpackFormat {
        name: "bztar",
        extensions: &[".tar.bz2", ".tbz2"],
        description: "bzip2'ed tar-file",
    },
    UnpackFormat {
        name: "gztar",
        extensions: &[".tar.gz", ".tgz"],
        description: "gzip'ed tar-file",
    },
    UnpackFormat {
        name: "tar",
        extensions: &[".tar"],
        description: "uncompressed tar file",
    },
    UnpackFormat {
        name: "xztar",
        extensions: &[".tar.xz", ".txz"],
        description: "xz'ed tar-file",
    },
    UnpackFormat {
        name: "zip",
        extensions: &[".zip"],
        description: "ZIP file",
    },
];

/// Returns true if the path's final extension names a known archive format.
///
/// Paths without an extension (or with an empty one, like `name.`) are not
/// archives. Matching ignores ASCII case.
pub fn is_archive(path: impl AsRef<Path>) -> bool {
    let Some(suffix) = final_suffix(path.as_ref()) else {
        return false;
    };

    UNPACK_FORMATS.iter().any(|format| {
        format
            .extensions
            .iter()
            .filter_map(|ext| ext.rsplit('.').next())
            .any(|known| known.eq_ignore_ascii_case(&suffix))
    })
}

fn final_suffix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (stem, suffix) = name.rsplit_once('.')?;
    if stem.is_empty() || suffix.is_empty() {
        return None;
    }
    Some(suffix.to_string())
}

/// Formats the native extractor can unpack itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the native format from the full file name, e.g. `.tar.gz`.
    /// Returns `None` for formats only the fallback tool handles.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else {
            None
        }
    }
}

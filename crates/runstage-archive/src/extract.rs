//! Archive extraction with an external-tool fallback
//!
//! Extraction first tries the native unpackers (zip, tar, tar.gz). If that
//! fails for any reason the configured fallback tool is run as
//! `<tool> <args...> <archive> <dest>`, with every path passed as its own
//! argument. Extraction is not atomic: a failed attempt may leave files behind
//! in the destination.

use crate::classify::ArchiveFormat;
use crate::error::ExtractError;
use flate2::read::GzDecoder;
use runstage_core::error_chain;
use runstage_core::types::ArchiveConfig;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// External unpack utility invoked when native extraction fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackTool {
    pub program: String,
    pub args: Vec<String>,
}

impl FallbackTool {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for FallbackTool {
    fn default() -> Self {
        let config = ArchiveConfig::default();
        Self::new(config.fallback_tool, config.fallback_args)
    }
}

/// Unpacks archives into destination directories
#[derive(Debug, Clone, Default)]
pub struct ArchiveExtractor {
    fallback: FallbackTool,
}

impl ArchiveExtractor {
    pub fn new(fallback: FallbackTool) -> Self {
        Self { fallback }
    }

    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self::new(FallbackTool::new(
            config.fallback_tool.clone(),
            config.fallback_args.clone(),
        ))
    }

    pub fn fallback(&self) -> &FallbackTool {
        &self.fallback
    }

    /// Extract `archive` into `dest`, returning `dest` on success.
    pub async fn extract(&self, archive: &Path, dest: &Path) -> Result<PathBuf, ExtractError> {
        match unpack_native(archive, dest) {
            Ok(count) => {
                info!("Extracted {} files from {}", count, archive.display());
                return Ok(dest.to_path_buf());
            }
            Err(e) => {
                warn!(
                    "Native unpack of {} failed: {}; trying {}",
                    archive.display(),
                    error_chain(&e),
                    self.fallback.program
                );
            }
        }

        self.run_fallback(archive, dest).await?;
        info!(
            "Extracted {} with {}",
            archive.display(),
            self.fallback.program
        );
        Ok(dest.to_path_buf())
    }

    async fn run_fallback(&self, archive: &Path, dest: &Path) -> Result<(), ExtractError> {
        let tool = &self.fallback.program;
        debug!("Running: {} {:?} {:?} {:?}", tool, self.fallback.args, archive, dest);

        let output = Command::new(tool)
            .args(&self.fallback.args)
            .arg(archive)
            .arg(dest)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExtractError::FallbackSpawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractError::FallbackFailed {
                tool: tool.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Unpack with the built-in decoders. Returns the number of files written.
pub fn unpack_native(archive: &Path, dest: &Path) -> Result<usize, ExtractError> {
    let format = ArchiveFormat::from_path(archive).ok_or_else(|| {
        ExtractError::UnsupportedFormat {
            path: archive.to_path_buf(),
        }
    })?;

    if !archive.is_file() {
        return Err(ExtractError::NotFound {
            path: archive.to_path_buf(),
        });
    }

    fs::create_dir_all(dest)?;

    match format {
        ArchiveFormat::Zip => unpack_zip(archive, dest),
        ArchiveFormat::Tar => unpack_tar(Archive::new(File::open(archive)?), dest),
        ArchiveFormat::TarGz => unpack_tar(Archive::new(GzDecoder::new(File::open(archive)?)), dest),
    }
}

fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<usize, ExtractError> {
    let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let Some(entry_path) = entry.enclosed_name() else {
            warn!("Skipping unsafe entry {:?} in {}", entry.name(), archive_path.display());
            continue;
        };
        let output_path = dest.join(entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&output_path)?;
            io::copy(&mut entry, &mut outfile)?;
            count += 1;
        }
    }

    Ok(count)
}

fn unpack_tar<R: io::Read>(mut archive: Archive<R>, dest: &Path) -> Result<usize, ExtractError> {
    let mut count = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_file = entry.header().entry_type().is_file();
        // unpack_in refuses entries that would escape dest
        if entry.unpack_in(dest)? && is_file {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    fn write_tar_gz(path: &Path, files: &[(&str, &[u8])]) {
        let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *content).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn missing_tool() -> ArchiveExtractor {
        ArchiveExtractor::new(FallbackTool::new(
            "runstage-test-no-such-unpacker",
            vec!["-overwrite".to_string(), "unarchive".to_string()],
        ))
    }

    #[test]
    fn test_unpack_zip_nested() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("code.zip");
        write_zip(&archive, &[("run.py", b"print('hi')"), ("lib/util.py", b"x = 1")]);

        let dest = temp.path().join("code");
        let count = unpack_native(&archive, &dest).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read(dest.join("run.py")).unwrap(), b"print('hi')");
        assert!(dest.join("lib/util.py").is_file());
    }

    #[test]
    fn test_unpack_tar_gz() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("inputs.tar.gz");
        write_tar_gz(&archive, &[("a.csv", b"1,2"), ("nested/b.csv", b"3,4")]);

        let dest = temp.path().join("inputs");
        let count = unpack_native(&archive, &dest).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read_to_string(dest.join("nested/b.csv")).unwrap(), "3,4");
    }

    #[test]
    fn test_unpack_native_rejects_unknown_format() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("data.tar.xz");
        fs::write(&archive, b"not really xz").unwrap();

        let result = unpack_native(&archive, &temp.path().join("out"));
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_unpack_native_missing_archive() {
        let temp = TempDir::new().unwrap();
        let result = unpack_native(&temp.path().join("gone.zip"), &temp.path().join("out"));
        assert!(matches!(result, Err(ExtractError::NotFound { .. })));
    }

    #[test]
    fn test_unpack_corrupt_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, b"PK but not really").unwrap();

        let result = unpack_native(&archive, &temp.path().join("out"));
        assert!(matches!(result, Err(ExtractError::Zip(_))));
    }

    #[tokio::test]
    async fn test_extract_returns_destination() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("code.zip");
        write_zip(&archive, &[("run.py", b"print('hi')")]);
        let dest = temp.path().join("code");

        let result = missing_tool().extract(&archive, &dest).await.unwrap();
        assert_eq!(result, dest);
        assert!(dest.join("run.py").exists());
    }

    #[tokio::test]
    async fn test_extract_fails_when_fallback_unavailable() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, b"garbage").unwrap();

        let result = missing_tool().extract(&archive, &temp.path().join("out")).await;
        assert!(matches!(result, Err(ExtractError::FallbackSpawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fallback_receives_discrete_arguments() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("odd name.tar.xz");
        fs::write(&archive, b"payload").unwrap();
        let dest = temp.path().join("out dir");

        // $1 is the archive and $2 the destination, whitespace intact
        let script = r#"mkdir -p "$2" && cp "$1" "$2/copied""#;
        let extractor = ArchiveExtractor::new(FallbackTool::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "fallback".to_string()],
        ));

        let result = extractor.extract(&archive, &dest).await.unwrap();
        assert_eq!(result, dest);
        assert_eq!(fs::read(dest.join("copied")).unwrap(), b"payload");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fallback_nonzero_exit_is_failure() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("data.tar.bz2");
        fs::write(&archive, b"payload").unwrap();

        let extractor = ArchiveExtractor::new(FallbackTool::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo cannot unpack >&2; exit 3".to_string(),
                "fallback".to_string(),
            ],
        ));

        let err = extractor
            .extract(&archive, &temp.path().join("out"))
            .await
            .unwrap_err();
        match err {
            ExtractError::FallbackFailed { stderr, .. } => assert_eq!(stderr, "cannot unpack"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_config() {
        let extractor = ArchiveExtractor::from_config(&ArchiveConfig::default());
        assert_eq!(extractor.fallback().program, "arc");
        assert_eq!(extractor.fallback().args, vec!["-overwrite", "unarchive"]);
    }
}

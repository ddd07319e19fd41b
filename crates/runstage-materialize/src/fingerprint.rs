//! Optional content fingerprints for materialized records

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Computes a content fingerprint for a file on disk
pub trait ContentHasher: Send + Sync {
    /// Short algorithm name, e.g. `sha256`
    fn algorithm(&self) -> &'static str;

    /// Hex digest of the file's content
    fn hash_file(&self, path: &Path) -> io::Result<String>;
}

/// SHA-256 fingerprints
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn algorithm(&self) -> &'static str {
        "sha256"
    }

    fn hash_file(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }
}

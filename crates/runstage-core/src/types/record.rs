//! Resource records: the unit of work threaded through materialization

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One artifact described by the run metadata.
///
/// A record carries its remote origin (`url`), the directory it lives in
/// (`path`), the path of the artifact itself (`filepath`) and, once
/// materialized, its `filename` and `size`. Fields unknown to runstage are
/// kept in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub filepath: Option<String>,

    /// Content fingerprint, only filled when hashing is requested
    #[serde(default)]
    pub hash: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,

    /// Byte length; accepts numbers or numeric strings on input
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceRecord {
    /// Record for a remote artifact that still has to be downloaded
    pub fn remote(
        url: impl Into<String>,
        filepath: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            path: Some(path.into()),
            filepath: Some(filepath.into()),
            ..Self::default()
        }
    }

    /// Record for a file found on disk
    pub fn discovered(
        path: impl Into<String>,
        filepath: impl Into<String>,
        filename: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            url: None,
            path: Some(path.into()),
            filepath: Some(filepath.into()),
            hash: None,
            filename: Some(filename.into()),
            size: Some(size),
            extra: Map::new(),
        }
    }

    /// Source URL, treating an empty string as absent
    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }

    /// Artifact path, treating an empty string as absent
    pub fn filepath(&self) -> Option<&str> {
        non_empty(self.filepath.as_deref())
    }

    /// Containing directory, treating an empty string as absent
    pub fn path(&self) -> Option<&str> {
        non_empty(self.path.as_deref())
    }

    /// URL and destination when both are present
    pub fn fetch_target(&self) -> Option<(&str, &str)> {
        Some((self.url()?, self.filepath()?))
    }

    /// Basename of `filepath`
    pub fn basename(&self) -> Option<String> {
        self.filepath()
            .and_then(|fp| Path::new(fp).file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Number(u64),
    Text(String),
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<SizeRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(SizeRepr::Number(n)) => Ok(Some(n)),
        Some(SizeRepr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(SizeRepr::Text(text)) => text
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid size: {:?}", text))),
    }
}

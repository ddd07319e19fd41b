//! HTTP download of single resources
//!
//! # Example
//!
//! ```no_run
//! use runstage_core::types::NetworkConfig;
//! use runstage_fetch::{HttpFetcher, ResourceFetcher};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), runstage_fetch::FetchError> {
//! let fetcher = HttpFetcher::new(&NetworkConfig::default())?.with_progress(false);
//! let bytes = fetcher
//!     .fetch("https://example.com/code.zip", Path::new("code/code.zip"))
//!     .await?;
//! println!("Wrote {} bytes", bytes);
//! # Ok(())
//! # }
//! ```

use crate::error::FetchError;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use runstage_core::types::NetworkConfig;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Something that can materialize a URL into a local file
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Retrieve `url` and write it to `dest`, creating or truncating it.
    /// Returns the number of bytes written.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// Fetcher backed by a reqwest client
pub struct HttpFetcher {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpFetcher {
    /// Create a fetcher from network settings. No timeout is applied unless
    /// `http_timeout_secs` is set.
    pub fn new(config: &NetworkConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build().map_err(FetchError::Client)?,
            show_progress: false,
        })
    }

    /// Enable or disable the download spinner
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn spinner(&self, url: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Downloading {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        info!("Downloading {} to {}", url, dest.display());
        let progress = self.spinner(url);

        let result = self.download(url, dest).await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let written = result?;
        info!("Download completed: {} ({} bytes)", dest.display(), written);
        Ok(written)
    }
}

impl HttpFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;

        let write_error = |source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        };
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(dest, &body).await.map_err(write_error)?;

        debug!("Wrote {} bytes to {}", body.len(), dest.display());
        Ok(body.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_timeout() {
        let fetcher = HttpFetcher::new(&NetworkConfig::default()).unwrap();
        assert!(!fetcher.show_progress);
        assert!(fetcher.spinner("http://x").is_none());
    }

    #[test]
    fn test_new_with_timeout() {
        let config = NetworkConfig {
            http_timeout_secs: Some(5),
            ..NetworkConfig::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap().with_progress(true);
        assert!(fetcher.show_progress);
    }
}

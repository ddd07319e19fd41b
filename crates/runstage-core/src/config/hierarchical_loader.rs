//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User runtime config (~/.runstage/runtime.yaml)
//! 3. Environment variables (RUNSTAGE_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const RUNTIME_DEFAULTS: &str = "runtime-defaults.yaml";
const RUNTIME_FILE: &str = "runtime.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Directory holding user configuration
    config_dir: PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader rooted at ~/.runstage
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Standard config directory (~/.runstage)
    fn get_config_dir() -> Result<PathBuf> {
        let home = env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;

        Ok(home.join(".runstage"))
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        let mut config = Self::load_embedded_config::<RuntimeConfig>(RUNTIME_DEFAULTS)?;

        let runtime_config_path = self.config_dir.join(RUNTIME_FILE);
        if runtime_config_path.exists() {
            debug!("Loading runtime config from {}", runtime_config_path.display());
            let file_config = Self::load_yaml_file::<RuntimeConfig>(&runtime_config_path)?;
            config = Self::merge_runtime_config(config, file_config);
        }

        Self::apply_env_overrides(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|e| {
            Error::invalid_config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Merge two runtime configs (base is overridden by overlay)
    fn merge_runtime_config(base: RuntimeConfig, overlay: RuntimeConfig) -> RuntimeConfig {
        let defaults = RuntimeConfig::default();
        RuntimeConfig {
            network: if overlay.network != defaults.network {
                overlay.network
            } else {
                base.network
            },
            archive: if overlay.archive != defaults.archive {
                overlay.archive
            } else {
                base.archive
            },
            report: if overlay.report != defaults.report {
                overlay.report
            } else {
                base.report
            },
            display: if overlay.display != defaults.display {
                overlay.display
            } else {
                base.display
            },
        }
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("RUNSTAGE_HTTP_TIMEOUT_SECS") {
            let secs = val.parse().map_err(|_| {
                Error::invalid_config("RUNSTAGE_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
            config.network.http_timeout_secs = Some(secs);
        }

        if let Ok(val) = env::var("RUNSTAGE_USER_AGENT") {
            config.network.user_agent = val;
        }

        if let Ok(val) = env::var("RUNSTAGE_FALLBACK_TOOL") {
            config.archive.fallback_tool = val;
        }

        if let Ok(val) = env::var("RUNSTAGE_REPORT_FILENAME") {
            if val.trim().is_empty() {
                return Err(Error::invalid_config(
                    "RUNSTAGE_REPORT_FILENAME must not be empty",
                ));
            }
            config.report.filename = val;
        }

        if let Ok(val) = env::var("RUNSTAGE_PROGRESS") {
            config.display.progress = val.parse().map_err(|_| {
                Error::invalid_config("RUNSTAGE_PROGRESS must be true or false")
            })?;
        }

        Ok(config)
    }
}

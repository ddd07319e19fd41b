//! Runtime configuration types for operational parameters
//!
//! These types control network behavior, the archive extraction fallback,
//! report formatting and terminal display.

use serde::{Deserialize, Serialize};

/// Default name of the report written under the workdir
pub const DEFAULT_REPORT_FILENAME: &str = "data-report.json";

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Archive extraction settings
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Display and output settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Whole-request timeout in seconds; unset means the transport default
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "runstage/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Archive extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArchiveConfig {
    /// External unpack utility used when native extraction fails
    #[serde(default = "default_fallback_tool")]
    pub fallback_tool: String,

    /// Arguments placed before the source and destination paths
    #[serde(default = "default_fallback_args")]
    pub fallback_args: Vec<String>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            fallback_tool: default_fallback_tool(),
            fallback_args: default_fallback_args(),
        }
    }
}

fn default_fallback_tool() -> String {
    "arc".to_string()
}

fn default_fallback_args() -> Vec<String> {
    vec!["-overwrite".to_string(), "unarchive".to_string()]
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportConfig {
    /// Report file name, written under the workdir
    #[serde(default = "default_report_filename")]
    pub filename: String,

    /// Spaces per indentation level
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            filename: default_report_filename(),
            indent: default_indent(),
        }
    }
}

fn default_report_filename() -> String {
    DEFAULT_REPORT_FILENAME.to_string()
}

fn default_indent() -> usize {
    4
}

/// Display and output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DisplayConfig {
    /// Show download spinners
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            progress: default_progress(),
        }
    }
}

fn default_progress() -> bool {
    true
}

/// Configuration schema and defaults for tubeseo.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[api]`, `[stream]`, `[dashboard]` and `[logging]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level tubeseo configuration.
///
/// Maps directly to the `~/.tubeseo/config.toml` and `.tubeseo.toml` file
/// schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeseoConfig {
    pub api: ApiConfig,
    pub stream: StreamConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend (gateway or web UI) exposing `/api/*`.
    pub base_url: String,
    /// Per-request timeout in milliseconds, including reading a stream.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [stream]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Maximum bytes requested per read of the generation stream.
    pub chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: crate::stream::DEFAULT_CHUNK_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Local web dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Address the dashboard server binds to.
    pub bind: String,
    /// Length of the default analytics date range, ending today.
    pub default_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:9747".to_string(),
            default_days: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostic log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// JSONL file; a leading `~/` expands to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.tubeseo/diagnostics.jsonl".to_string(),
        }
    }
}

impl LoggingConfig {
    /// The log path with `~/` expanded. `None` when the home directory is
    /// needed but unknown.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match self.path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(&self.path)),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl TubeseoConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `tubeseo config init` to create a starting config file with
    /// all settings documented.
    pub fn default_toml() -> String {
        r#"# tubeseo Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (TUBESEO_*)
#   2. Project config (.tubeseo.toml in current directory)
#   3. User global config (~/.tubeseo/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://localhost:5000"    # serves /api/videos, /api/analytics, /api/seo/generate
timeout_ms = 30000

[stream]
chunk_size = 8192                     # bytes per read of the generation stream

[dashboard]
bind = "127.0.0.1:9747"
default_days = 30                     # default analytics range, ending today

[logging]
enabled = true
path = "~/.tubeseo/diagnostics.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Configuration schema for bincache
//!
//! Configuration is stored at `~/.config/bincache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache location settings
    pub cache: CacheConfig,

    /// Download behavior settings
    pub download: DownloadConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Override for the cache root directory.
    /// Defaults to the per-user cache directory plus "bincache".
    pub root: Option<PathBuf>,
}

/// Download behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Default number of download attempts per binary (minimum 1)
    pub retries: u32,

    /// URL template with `{name}` and `{version}` placeholders
    pub base_url: String,
}

/// Where pre-built binaries are published. `{name}` and `{version}` are
/// substituted from the binary identifier.
pub const DEFAULT_BASE_URL: &str =
    "https://storage.googleapis.com/pre-commit-assets/{name}/{version}/bin/{name}";

/// Default download attempts when neither config nor CLI specify one.
pub const DEFAULT_RETRIES: u32 = 3;

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

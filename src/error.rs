//! Error types for bincache
//!
//! All modules use `BincacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bincache operations
pub type BincacheResult<T> = Result<T, BincacheError>;

/// All errors that can occur in bincache
#[derive(Error, Debug)]
pub enum BincacheError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache directory {path} is not usable: {source}")]
    CacheDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid binary identifier '{value}': {reason}")]
    InvalidBinaryId { value: String, reason: String },

    // Lock errors
    #[error("Advisory file locking is not supported on the filesystem holding {path}")]
    LockUnsupported {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to acquire cache lock at {path}: {source}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Download errors
    #[error("Transfer failed for {url}: {reason}")]
    Transfer { url: String, reason: String },

    #[error("Download of {binary} failed after {attempts} attempt(s): {last_error}")]
    DownloadExhausted {
        binary: String,
        attempts: u32,
        last_error: String,
    },

    // Execution errors
    #[error("Failed to execute {command}: {source}")]
    LaunchFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process terminated by signal")]
    ProcessSignaled,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BincacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether a failed download attempt may be retried within the budget.
    ///
    /// Only transfer-level failures are retryable; configuration and lock
    /// errors abort immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transfer { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::LockUnsupported { .. } => {
                Some("Point --cache-dir at a local filesystem; network mounts often lack flock")
            }
            Self::CacheDirCreate { .. } => {
                Some("Check permissions on the cache directory or pass --cache-dir")
            }
            Self::DownloadExhausted { .. } => {
                Some("Check the download URL and network connectivity, or raise --retries")
            }
            _ => None,
        }
    }
}

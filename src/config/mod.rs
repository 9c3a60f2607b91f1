//! Configuration management for bincache

pub mod schema;

pub use schema::Config;

use crate::error::{BincacheError, BincacheResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bincache")
            .join("config.toml")
    }

    /// Default cache root: the per-user cache directory plus "bincache"
    pub fn default_cache_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bincache")
    }

    /// Resolve the effective cache root.
    ///
    /// Precedence: CLI `--cache-dir` > config `cache.root` > default.
    pub fn resolve_cache_root(cli_override: Option<&Path>, config: &Config) -> PathBuf {
        if let Some(dir) = cli_override {
            return dir.to_path_buf();
        }
        if let Some(ref dir) = config.cache.root {
            return dir.clone();
        }
        Self::default_cache_root()
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> BincacheResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> BincacheResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| BincacheError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| BincacheError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> BincacheResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            BincacheError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> BincacheResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BincacheError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.download.retries, 3);
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.download.retries = 7;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.download.retries, 7);
    }

    #[tokio::test]
    async fn load_invalid_toml_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "not = [valid").await.unwrap();
        let manager = ConfigManager::with_path(path);

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, BincacheError::ConfigInvalid { .. }));
    }

    #[test]
    fn cache_root_precedence() {
        let mut config = Config::default();
        config.cache.root = Some(PathBuf::from("/from/config"));

        let cli = PathBuf::from("/from/cli");
        assert_eq!(
            ConfigManager::resolve_cache_root(Some(&cli), &config),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            ConfigManager::resolve_cache_root(None, &config),
            PathBuf::from("/from/config")
        );

        config.cache.root = None;
        assert_eq!(
            ConfigManager::resolve_cache_root(None, &config),
            ConfigManager::default_cache_root()
        );
    }
}

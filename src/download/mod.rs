//! Download orchestration: ensure a binary is cached, then run it
//!
//! `ensure_cached` is a two-phase check-and-populate:
//!
//! 1. Fast path, no lock: a warm cache returns immediately. Safe because
//!    entries are immutable once created and never deleted.
//! 2. Slow path: take the per-binary [`CacheLock`], re-check (another
//!    process may have populated the entry while we waited), then run the
//!    bounded retry loop. Each attempt downloads into a staging file and
//!    only a complete download is renamed into the final path, so no
//!    partial file is ever visible there.

pub mod transfer;

pub use transfer::{HttpTransfer, Transfer};

use crate::cache::{BinarySpec, CacheLock, CacheStore};
use crate::error::{BincacheError, BincacheResult};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Orchestrates cache checks, locked downloads, and binary execution.
#[derive(Clone)]
pub struct Downloader {
    store: CacheStore,
    transfer: Arc<dyn Transfer>,
    base_url: String,
    url_override: Option<String>,
    retries: u32,
}

impl Downloader {
    /// `retries` is clamped to a minimum of one attempt.
    pub fn new(
        store: CacheStore,
        transfer: Arc<dyn Transfer>,
        base_url: impl Into<String>,
        retries: u32,
    ) -> Self {
        Self {
            store,
            transfer,
            base_url: base_url.into(),
            url_override: None,
            retries: retries.max(1),
        }
    }

    /// Use a fixed source URL instead of the template (CLI `--url`)
    pub fn with_url_override(mut self, url: Option<String>) -> Self {
        self.url_override = url;
        self
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Resolve the source URL for a binary from the template, unless an
    /// explicit override was given.
    pub fn resolve_url(&self, spec: &BinarySpec) -> String {
        match self.url_override {
            Some(ref url) => url.clone(),
            None => self
                .base_url
                .replace("{name}", spec.name())
                .replace("{version}", spec.version()),
        }
    }

    /// Ensure a valid cached copy of `spec` exists and return its path.
    ///
    /// At most one process downloads a given binary at a time; everyone
    /// else either hits the fast path or blocks on the lock and then finds
    /// the entry already populated.
    pub async fn ensure_cached(&self, spec: &BinarySpec) -> BincacheResult<PathBuf> {
        let entry = self.store.entry_path(spec);

        // Fast path: warm cache, no lock contention
        if self.store.is_valid_entry(&entry).await? {
            debug!("Cache hit for {} at {}", spec, entry.display());
            self.store.ensure_executable(&entry).await;
            return Ok(entry);
        }

        self.store.ensure_root().await?;
        let _lock = CacheLock::acquire(self.store.root(), &spec.lock_key()).await?;

        // Re-check under the lock: another process may have won the race
        if self.store.is_valid_entry(&entry).await? {
            debug!("Cache populated by concurrent process for {}", spec);
            self.store.ensure_executable(&entry).await;
            return Ok(entry);
        }

        self.store.ensure_entry_dir(spec).await?;
        let url = self.resolve_url(spec);
        let staging = self.store.staging_path(spec);

        let mut last_error = String::new();
        for attempt in 1..=self.retries {
            match self.attempt_download(&url, &staging).await {
                Ok(bytes) => {
                    self.store.commit(&staging, &entry).await?;
                    info!(
                        "Downloaded {} ({} bytes) from {} to {}",
                        spec,
                        bytes,
                        url,
                        entry.display()
                    );
                    return Ok(entry);
                }
                Err(e) if e.is_retryable() => {
                    warn!(
                        "Download attempt {}/{} for {} failed: {}",
                        attempt, self.retries, spec, e
                    );
                    last_error = e.to_string();
                    // Drop any bytes the failed attempt left in staging
                    let _ = fs::remove_file(&staging).await;
                }
                Err(e) => {
                    let _ = fs::remove_file(&staging).await;
                    return Err(e);
                }
            }
        }

        Err(BincacheError::DownloadExhausted {
            binary: spec.to_string(),
            attempts: self.retries,
            last_error,
        })
    }

    /// One attempt: fetch into staging and insist on a non-empty result.
    /// An empty payload is a truncated transfer, not a cacheable binary.
    async fn attempt_download(&self, url: &str, staging: &Path) -> BincacheResult<u64> {
        let bytes = self.transfer.fetch(url, staging).await?;
        if bytes == 0 {
            return Err(BincacheError::Transfer {
                url: url.to_string(),
                reason: "empty response body".to_string(),
            });
        }
        Ok(bytes)
    }

    /// Ensure the binary is cached, then execute it with `args`, returning
    /// the child's exit status.
    pub async fn run_binary(
        &self,
        spec: &BinarySpec,
        args: &[String],
    ) -> BincacheResult<ExitStatus> {
        let path = self.ensure_cached(spec).await?;
        exec_binary(&path, args).await
    }
}

/// Execute a binary and wait for it, inheriting stdio
pub async fn exec_binary(path: &Path, args: &[String]) -> BincacheResult<ExitStatus> {
    debug!("Executing {} {:?}", path.display(), args);
    tokio::process::Command::new(path)
        .args(args)
        .status()
        .await
        .map_err(|e| BincacheError::LaunchFailed {
            command: path.display().to_string(),
            source: e,
        })
}

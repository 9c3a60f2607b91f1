//! Per-binary advisory file locks
//!
//! Serializes concurrent downloads of the same binary across independent
//! processes. Lock files live under `<root>/.locks/` and are keyed by the
//! binary identifier; the lock is released when the [`CacheLock`] guard is
//! dropped, on every exit path. Lock files themselves are never deleted --
//! only the flock state is meaningful.

use crate::error::{BincacheError, BincacheResult};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An exclusive lock over one cache entry's check-and-populate sequence.
///
/// Acquisition blocks until the current holder releases; there is no
/// timeout, because the holder always completes (its download finishes or
/// fails and the guard drops).
pub struct CacheLock {
    file: File,
    path: PathBuf,
}

impl CacheLock {
    /// Acquire the exclusive lock for `key` under `cache_root`.
    ///
    /// Creates `<cache_root>/.locks/<key>.lock` if needed and takes a
    /// blocking exclusive flock on it inside `spawn_blocking`, so the
    /// runtime is not stalled while waiting on another process.
    ///
    /// A filesystem that does not support advisory locking is a fatal
    /// configuration error, never a silent fall-through to unsynchronized
    /// access.
    pub async fn acquire(cache_root: &Path, key: &str) -> BincacheResult<Self> {
        let locks_dir = cache_root.join(".locks");
        tokio::fs::create_dir_all(&locks_dir)
            .await
            .map_err(|e| BincacheError::CacheDirCreate {
                path: locks_dir.clone(),
                source: e,
            })?;

        let path = locks_dir.join(format!("{key}.lock"));
        let lock_path = path.clone();

        let file = tokio::task::spawn_blocking(move || -> BincacheResult<File> {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)
                .map_err(|e| BincacheError::io(
                    format!("opening lock file {}", lock_path.display()),
                    e,
                ))?;

            file.lock_exclusive()
                .map_err(|e| classify_lock_error(&lock_path, e))?;

            Ok(file)
        })
        .await
        .map_err(|e| BincacheError::Internal(format!("lock acquisition task failed: {e}")))??;

        debug!("Acquired cache lock {}", path.display());
        Ok(Self { file, path })
    }

    /// Path of the underlying lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        // Closing the file would release the lock anyway; unlock explicitly
        // so the release is visible before the handle goes away.
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release lock {}: {}", self.path.display(), e);
        } else {
            debug!("Released cache lock {}", self.path.display());
        }
    }
}

/// Distinguish "this filesystem cannot flock" (fatal configuration error)
/// from other acquisition failures.
fn classify_lock_error(path: &Path, source: io::Error) -> BincacheError {
    // EINVAL, ENOLCK, EOPNOTSUPP: typical for network filesystems
    let unsupported = source.kind() == io::ErrorKind::Unsupported
        || matches!(source.raw_os_error(), Some(22) | Some(37) | Some(95));

    if unsupported {
        BincacheError::LockUnsupported {
            path: path.to_path_buf(),
            source,
        }
    } else {
        BincacheError::LockFailed {
            path: path.to_path_buf(),
            source,
        }
    }
}

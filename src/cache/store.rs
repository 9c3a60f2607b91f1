//! Cache entry layout and persistence
//!
//! A cached binary lives at `<root>/<name>/<version>/<name>`. Entries are
//! written by renaming a fully downloaded staging file into place, so a
//! file at the final path is always complete. Existence of a non-empty
//! file is the sole validity criterion; there is no checksum sidecar.

use crate::error::{BincacheError, BincacheResult};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Identifies one fetchable executable: the cache key and lock key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinarySpec {
    name: String,
    version: String,
}

impl BinarySpec {
    /// Create a spec, rejecting values that cannot be used as path segments.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> BincacheResult<Self> {
        let name = name.into();
        let version = version.into();
        validate_segment(&name, "name")?;
        validate_segment(&version, "version")?;
        Ok(Self { name, version })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Stable key used for the per-binary lock file name
    pub fn lock_key(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl fmt::Display for BinarySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

fn validate_segment(value: &str, field: &str) -> BincacheResult<()> {
    let reason = if value.is_empty() {
        Some(format!("{field} must not be empty"))
    } else if value == "." || value == ".." {
        Some(format!("{field} must not be a relative path component"))
    } else if value.contains('/') || value.contains('\\') || value.contains('\0') {
        Some(format!("{field} must not contain path separators"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(BincacheError::InvalidBinaryId {
            value: value.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// A binary found while walking the cache root
#[derive(Debug, Clone, Serialize)]
pub struct CachedBinary {
    pub name: String,
    pub version: String,
    pub size: u64,
    pub path: PathBuf,
}

/// Filesystem layout of the cache: path derivation, validity checks,
/// and atomic persistence of downloaded binaries.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the cache root if needed. Fails with a configuration error
    /// when the directory cannot be created or is not writable.
    pub async fn ensure_root(&self) -> BincacheResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| BincacheError::CacheDirCreate {
                path: self.root.clone(),
                source: e,
            })
    }

    /// Final path of the cache entry for a binary
    pub fn entry_path(&self, spec: &BinarySpec) -> PathBuf {
        self.root
            .join(spec.name())
            .join(spec.version())
            .join(spec.name())
    }

    /// Staging path for in-progress downloads, in the same directory as
    /// the entry so the final rename never crosses filesystems.
    pub fn staging_path(&self, spec: &BinarySpec) -> PathBuf {
        let mut path = self.entry_path(spec).into_os_string();
        path.push(".part");
        PathBuf::from(path)
    }

    /// Whether a valid entry exists at `path`: a non-empty regular file.
    /// A zero-byte or missing file is never a cache hit.
    pub async fn is_valid_entry(&self, path: &Path) -> BincacheResult<bool> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_file() && meta.len() > 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BincacheError::io(
                format!("checking cache entry {}", path.display()),
                e,
            )),
        }
    }

    /// Move a fully written staging file into its final entry path and set
    /// the executable bits. Nothing appears at the final path unless the
    /// staging file was complete.
    pub async fn commit(&self, staging: &Path, entry: &Path) -> BincacheResult<()> {
        fs::rename(staging, entry).await.map_err(|e| {
            BincacheError::io(
                format!(
                    "moving {} into place at {}",
                    staging.display(),
                    entry.display()
                ),
                e,
            )
        })?;
        self.ensure_executable(entry).await;
        debug!("Committed cache entry {}", entry.display());
        Ok(())
    }

    /// Create the parent directory for an entry (and its staging file)
    pub async fn ensure_entry_dir(&self, spec: &BinarySpec) -> BincacheResult<()> {
        let entry = self.entry_path(spec);
        if let Some(parent) = entry.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BincacheError::CacheDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Set mode 755 on the entry. Failure is logged, not fatal: the file
    /// may already be executable, or the bit may be fixed out of band.
    pub async fn ensure_executable(&self, path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o755);
            if let Err(e) = fs::set_permissions(path, perms).await {
                warn!("Failed to set mode 755 on {}: {}", path.display(), e);
            }
        }
        #[cfg(not(unix))]
        {
            let _ = path;
        }
    }

    /// Walk the cache root and list every cached binary. There is no
    /// manifest; the directory tree is the only record.
    pub async fn entries(&self) -> BincacheResult<Vec<CachedBinary>> {
        let mut found = Vec::new();
        let mut names = match fs::read_dir(&self.root).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(found),
            Err(e) => {
                return Err(BincacheError::io(
                    format!("reading cache root {}", self.root.display()),
                    e,
                ))
            }
        };

        while let Some(name_entry) = names
            .next_entry()
            .await
            .map_err(|e| BincacheError::io("walking cache root", e))?
        {
            let name = name_entry.file_name().to_string_lossy().to_string();
            if name == ".locks" || !name_entry.path().is_dir() {
                continue;
            }

            let mut versions = fs::read_dir(name_entry.path())
                .await
                .map_err(|e| BincacheError::io(format!("reading cache dir for {name}"), e))?;
            while let Some(version_entry) = versions
                .next_entry()
                .await
                .map_err(|e| BincacheError::io("walking cache versions", e))?
            {
                let version = version_entry.file_name().to_string_lossy().to_string();
                let path = version_entry.path().join(&name);
                match fs::metadata(&path).await {
                    Ok(meta) if meta.is_file() => found.push(CachedBinary {
                        name: name.clone(),
                        version,
                        size: meta.len(),
                        path,
                    }),
                    // Staging leftovers or foreign files, not entries
                    _ => continue,
                }
            }
        }

        found.sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec(name: &str, version: &str) -> BinarySpec {
        BinarySpec::new(name, version).unwrap()
    }

    #[test]
    fn spec_display() {
        assert_eq!(spec("shellcheck", "0.9.0").to_string(), "shellcheck@0.9.0");
    }

    #[test]
    fn spec_lock_key() {
        assert_eq!(spec("tool", "v2").lock_key(), "tool-v2");
    }

    #[test]
    fn spec_rejects_bad_segments() {
        assert!(BinarySpec::new("", "1.0").is_err());
        assert!(BinarySpec::new("tool", "").is_err());
        assert!(BinarySpec::new("../etc", "1.0").is_err());
        assert!(BinarySpec::new("tool", "..").is_err());
        assert!(BinarySpec::new("a/b", "1.0").is_err());
        assert!(BinarySpec::new("a\\b", "1.0").is_err());
    }

    #[test]
    fn entry_and_staging_paths() {
        let store = CacheStore::new("/cache");
        let s = spec("tool", "v2");
        assert_eq!(store.entry_path(&s), PathBuf::from("/cache/tool/v2/tool"));
        assert_eq!(
            store.staging_path(&s),
            PathBuf::from("/cache/tool/v2/tool.part")
        );
    }

    #[tokio::test]
    async fn missing_entry_is_not_valid() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());
        let path = store.entry_path(&spec("tool", "v1"));
        assert!(!store.is_valid_entry(&path).await.unwrap());
    }

    #[tokio::test]
    async fn zero_byte_entry_is_not_valid() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());
        let s = spec("tool", "v1");
        store.ensure_entry_dir(&s).await.unwrap();
        let path = store.entry_path(&s);
        fs::write(&path, b"").await.unwrap();
        assert!(!store.is_valid_entry(&path).await.unwrap());
    }

    #[tokio::test]
    async fn non_empty_entry_is_valid() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());
        let s = spec("tool", "v1");
        store.ensure_entry_dir(&s).await.unwrap();
        let path = store.entry_path(&s);
        fs::write(&path, b"#!/bin/sh\n").await.unwrap();
        assert!(store.is_valid_entry(&path).await.unwrap());
    }

    #[tokio::test]
    async fn commit_moves_and_marks_executable() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());
        let s = spec("tool", "v1");
        store.ensure_entry_dir(&s).await.unwrap();

        let staging = store.staging_path(&s);
        let entry = store.entry_path(&s);
        fs::write(&staging, b"binary bytes").await.unwrap();

        store.commit(&staging, &entry).await.unwrap();

        assert!(!staging.exists());
        assert!(store.is_valid_entry(&entry).await.unwrap());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&entry).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[tokio::test]
    async fn entries_walks_tree_and_skips_locks() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        for (name, version, bytes) in [
            ("alpha", "1.0", &b"aaaa"[..]),
            ("alpha", "2.0", &b"bbbbbb"[..]),
            ("beta", "0.1", &b"cc"[..]),
        ] {
            let s = spec(name, version);
            store.ensure_entry_dir(&s).await.unwrap();
            fs::write(store.entry_path(&s), bytes).await.unwrap();
        }
        fs::create_dir_all(temp.path().join(".locks")).await.unwrap();
        fs::write(temp.path().join(".locks/alpha-1.0.lock"), b"")
            .await
            .unwrap();

        let entries = store.entries().await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "alpha");
        assert_eq!(entries[0].version, "1.0");
        assert_eq!(entries[0].size, 4);
        assert_eq!(entries[2].name, "beta");
    }

    #[tokio::test]
    async fn entries_empty_root() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path().join("missing"));
        assert!(store.entries().await.unwrap().is_empty());
    }
}

//! Shared binary cache: layout, validity, and cross-process locking
//!
//! The cache is a plain directory tree with no manifest. Each entry is
//! written exactly once via temp-then-rename and treated as immutable
//! afterwards; bincache never deletes entries.
//!
//! # Concurrency model
//!
//! | Phase | Lock | Rationale |
//! |-------|------|-----------|
//! | Fast-path existence check | none | entries are never deleted, so a positive read is always safe |
//! | Re-check + download + commit | exclusive per-binary flock | at most one writer per entry, ever |

pub mod lock;
pub mod store;

pub use lock::CacheLock;
pub use store::{BinarySpec, CacheStore, CachedBinary};

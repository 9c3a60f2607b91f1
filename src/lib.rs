//! bincache - Shared per-user cache of downloaded executables
//!
//! Ensures a usable local copy of a named, versioned binary exists under
//! the standard cache directory (downloading it on first use) and executes
//! it, with cross-process locking so concurrent invocations never race to
//! download the same binary or run a partially written file.

pub mod cache;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;

pub use error::{BincacheError, BincacheResult};

//! Byte-transfer seam between the orchestrator and the network
//!
//! [`Transfer`] is the narrow interface the retry loop drives; the real
//! implementation is an HTTP GET, tests substitute counting stubs.

use crate::error::{BincacheError, BincacheResult};
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Fetches bytes from a source location into a destination file.
///
/// A successful call means `dest` holds the complete payload and the byte
/// count is returned. Any transport failure (network error, non-success
/// response, truncated write) surfaces as [`BincacheError::Transfer`]; the
/// caller decides whether to retry.
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> BincacheResult<u64>;
}

/// HTTP transfer backed by `ureq`. The blocking request runs on the
/// blocking thread pool; timeouts are ureq's own.
pub struct HttpTransfer;

#[async_trait]
impl Transfer for HttpTransfer {
    async fn fetch(&self, url: &str, dest: &Path) -> BincacheResult<u64> {
        let url = url.to_string();
        let dest = dest.to_path_buf();

        tokio::task::spawn_blocking(move || -> BincacheResult<u64> {
            let response = ureq::get(&url).call().map_err(|e| BincacheError::Transfer {
                url: url.clone(),
                reason: e.to_string(),
            })?;

            let mut reader = response.into_body().into_reader();
            let mut file = std::fs::File::create(&dest)
                .map_err(|e| BincacheError::io(format!("creating {}", dest.display()), e))?;

            let bytes = std::io::copy(&mut reader, &mut file).map_err(|e| {
                BincacheError::Transfer {
                    url: url.clone(),
                    reason: format!("body read failed: {e}"),
                }
            })?;

            debug!("Fetched {} bytes from {}", bytes, url);
            Ok(bytes)
        })
        .await
        .map_err(|e| BincacheError::Internal(format!("transfer task failed: {e}")))?
    }
}

//! CLI command implementations

pub mod config;
pub mod fetch;
pub mod list;
pub mod path;
pub mod run;

pub use config::execute as config;
pub use fetch::execute as fetch;
pub use list::execute as list;
pub use path::execute as path;
pub use run::execute as run;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::download::{Downloader, HttpTransfer};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;

/// Build a downloader wired to the real HTTP transfer
fn build_downloader(
    config: &Config,
    cache_root: &Path,
    retries: Option<u32>,
    url: Option<String>,
) -> Downloader {
    Downloader::new(
        CacheStore::new(cache_root),
        Arc::new(HttpTransfer),
        config.download.base_url.clone(),
        retries.unwrap_or(config.download.retries),
    )
    .with_url_override(url)
}

fn create_progress_bar(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

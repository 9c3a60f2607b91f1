//! Fetch command - populate the cache without executing

use crate::cache::BinarySpec;
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::BincacheResult;
use console::style;
use std::path::Path;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config, cache_root: &Path) -> BincacheResult<()> {
    let spec = BinarySpec::new(&args.name, &args.version)?;
    let downloader = super::build_downloader(config, cache_root, args.retries, args.url.clone());

    let pb = super::create_progress_bar(&format!("Fetching {spec}..."));
    let result = downloader.ensure_cached(&spec).await;
    pb.finish_and_clear();
    let path = result?;

    println!(
        "{} {} cached at {}",
        style("✓").green(),
        style(&spec.to_string()).cyan(),
        path.display()
    );

    Ok(())
}

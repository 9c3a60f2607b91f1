//! Path command - print the cache entry path without downloading

use crate::cache::{BinarySpec, CacheStore};
use crate::cli::args::PathArgs;
use crate::config::Config;
use crate::error::BincacheResult;
use std::path::Path;

/// Execute the path command
pub async fn execute(args: PathArgs, _config: &Config, cache_root: &Path) -> BincacheResult<()> {
    let spec = BinarySpec::new(&args.name, &args.version)?;
    let store = CacheStore::new(cache_root);
    println!("{}", store.entry_path(&spec).display());
    Ok(())
}

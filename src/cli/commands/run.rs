//! Run command - ensure a binary is cached, then execute it

use crate::cache::BinarySpec;
use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::download::exec_binary;
use crate::error::{BincacheError, BincacheResult};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

/// Execute the run command, returning the child's exit code
pub async fn execute(args: RunArgs, config: &Config, cache_root: &Path) -> BincacheResult<ExitCode> {
    let status = if let Some(ref path) = args.bin_path {
        // Local override: use the given binary as-is, no cache involvement
        info!("Using local binary override {}", path.display());
        if !path.exists() {
            return Err(BincacheError::PathNotFound(path.clone()));
        }
        exec_binary(path, &args.args).await?
    } else {
        let spec = BinarySpec::new(&args.name, &args.version)?;
        let downloader = super::build_downloader(config, cache_root, args.retries, args.url.clone());
        downloader.run_binary(&spec, &args.args).await?
    };

    debug!("Child exited with {:?}", status.code());

    match status.code() {
        Some(code) => Ok(ExitCode::from(code.clamp(0, 255) as u8)),
        None => Err(BincacheError::ProcessSignaled),
    }
}

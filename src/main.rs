//! bincache - Shared cache of downloaded executables
//!
//! CLI entry point that dispatches to subcommands.

use bincache::cli::{Cli, Commands};
use bincache::config::ConfigManager;
use bincache::error::BincacheResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> BincacheResult<ExitCode> {
    let cli = Cli::parse();

    // Load configuration before logging so the configured format applies
    let manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = manager.load().await?;

    init_logging(cli.verbose, &config.general.log_format);

    let cache_root = ConfigManager::resolve_cache_root(cli.cache_dir.as_deref(), &config);

    // Dispatch to command
    match cli.command {
        Commands::Run(args) => bincache::cli::commands::run(args, &config, &cache_root).await,
        Commands::Fetch(args) => {
            bincache::cli::commands::fetch(args, &config, &cache_root).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Path(args) => {
            bincache::cli::commands::path(args, &config, &cache_root).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::List(args) => {
            bincache::cli::commands::list(args, &config, &cache_root).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(args) => {
            bincache::cli::commands::config(args, &config, &manager).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("bincache=warn"),
        1 => EnvFilter::new("bincache=info"),
        _ => EnvFilter::new("bincache=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

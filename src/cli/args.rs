//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// bincache - Shared cache of downloaded executables
///
/// Downloads named, versioned binaries into the per-user cache directory
/// on first use and runs them, safe against concurrent invocations.
#[derive(Parser, Debug)]
#[command(name = "bincache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BINCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache root directory (overrides config)
    #[arg(long, global = true, env = "BINCACHE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ensure a binary is cached, then execute it
    Run(RunArgs),

    /// Download a binary into the cache without running it
    Fetch(FetchArgs),

    /// Print the cache path for a binary without downloading
    Path(PathArgs),

    /// List cached binaries
    List(ListArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Binary name
    pub name: String,

    /// Binary version
    pub version: String,

    /// Download attempts before giving up (minimum 1)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,

    /// Download from this URL instead of the configured template
    #[arg(long)]
    pub url: Option<String>,

    /// Use a local binary directly instead of the cache
    #[arg(long)]
    pub bin_path: Option<PathBuf>,

    /// Arguments passed to the binary
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Binary name
    pub name: String,

    /// Binary version
    pub version: String,

    /// Download attempts before giving up (minimum 1)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,

    /// Download from this URL instead of the configured template
    #[arg(long)]
    pub url: Option<String>,
}

/// Arguments for the path command
#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Binary name
    pub name: String,

    /// Binary version
    pub version: String,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

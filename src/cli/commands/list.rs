//! List command - show cached binaries

use crate::cache::{CacheStore, CachedBinary};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::BincacheResult;
use console::style;
use std::path::Path;

/// Execute the list command
pub async fn execute(args: ListArgs, _config: &Config, cache_root: &Path) -> BincacheResult<()> {
    let store = CacheStore::new(cache_root);
    let entries = store.entries().await?;

    if entries.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No cached binaries in {}", cache_root.display()),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => print_plain(&entries),
    }

    Ok(())
}

fn print_table(entries: &[CachedBinary]) {
    println!(
        "{:<20} {:<15} {:>10}  {}",
        style("NAME").bold(),
        style("VERSION").bold(),
        style("SIZE").bold(),
        style("PATH").bold()
    );
    println!("{}", "-".repeat(70));

    for entry in entries {
        println!(
            "{:<20} {:<15} {:>10}  {}",
            entry.name,
            entry.version,
            format_size(entry.size),
            entry.path.display()
        );
    }
}

fn print_json(entries: &[CachedBinary]) -> BincacheResult<()> {
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}

fn print_plain(entries: &[CachedBinary]) {
    for entry in entries {
        println!("{}@{}", entry.name, entry.version);
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}

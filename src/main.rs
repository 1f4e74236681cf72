//! Main entry point for the fileloc CLI application.
//!
//! Builds a location from the command line, then prints its URI, its size,
//! its content, or (for archives) its entry listing.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;

use fileloc::{Cli, Location, ZipArchive};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let location = build_location(&cli)?;

    if cli.list {
        let archive = ZipArchive::open_location(location.clone())
            .with_context(|| format!("cannot open archive {location}"))?;
        list_files(&archive, cli.verbose_list);
        return Ok(());
    }

    if cli.uri {
        println!("{location}");
        return Ok(());
    }

    let mut data = location
        .data()
        .with_context(|| format!("cannot open {location}"))?;

    if cli.size {
        println!("{}", data.size()?);
        return Ok(());
    }

    let content = data
        .read_to_vec()
        .with_context(|| format!("cannot read {location}"))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&content)?;
    stdout.flush()?;

    Ok(())
}

/// Turn FILE, the `-e` chain and `-r` into a single location.
///
/// The first entry addresses FILE as an archive. Every further entry opens
/// the previous location as a nested archive and descends into it.
fn build_location(cli: &Cli) -> Result<Location> {
    let mut entries = cli.entries.iter();

    let mut location = match entries.next() {
        Some(first) => Location::in_archive_file(&cli.file, first.as_str()),
        None => Location::from_file(&cli.file),
    };

    for entry in entries {
        let archive = ZipArchive::open_location(location.clone())
            .with_context(|| format!("cannot open nested archive {location}"))?;
        location = Location::in_archive(Arc::new(archive), entry.as_str());
    }

    if let Some(relative) = &cli.relative {
        location = location.join(relative);
    }

    Ok(location)
}

/// List files in the archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just file names, one per line
/// - Verbose format (`-l -V`): Table with sizes, compression ratio and timestamps
fn list_files(archive: &ZipArchive, verbose: bool) {
    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in archive.entries() {
        if !verbose {
            println!("{}", entry.file_name);
            continue;
        }

        let (year, month, day) = entry.mod_date();
        let (hour, minute, _second) = entry.mod_time();

        println!(
            "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            ratio(entry.compressed_size, entry.uncompressed_size),
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name
        );

        if !entry.is_directory {
            total_uncompressed += entry.uncompressed_size;
            total_compressed += entry.compressed_size;
            file_count += 1;
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed,
            total_compressed,
            ratio(total_compressed, total_uncompressed),
            "",
            file_count
        );
    }
}

/// Space saved by compression, as a right-aligned percentage.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed == 0 || compressed > uncompressed {
        return "  0%".to_string();
    }
    format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_formatting() {
        assert_eq!(ratio(25, 100), "  75%");
        assert_eq!(ratio(0, 0), "  0%");
        assert_eq!(ratio(120, 100), "  0%");
    }

    #[test]
    fn relative_applies_after_entries() {
        let cli = Cli::parse_from(["fileloc", "/opt/omni.ja", "-e", "chrome/a.js", "-r", "b.js"]);
        let location = build_location(&cli).unwrap();
        assert_eq!(location.entry_path(), "chrome/b.js");
    }

    #[test]
    fn no_entries_means_plain_file() {
        let cli = Cli::parse_from(["fileloc", "notes.txt"]);
        assert!(!build_location(&cli).unwrap().is_archive());
    }
}

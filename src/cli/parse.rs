//! CLI parse: clap types for mirrorsync. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// mirrorsync - keep a replica folder identical to a source folder
#[derive(Parser, Debug)]
#[command(name = "mirrorsync", version)]
#[command(about = "One-way folder mirroring on a fixed interval")]
pub struct Cli {
    /// Source folder path
    pub source: Option<PathBuf>,

    /// Replica folder path
    pub replica: Option<PathBuf>,

    /// Synchronization interval in seconds
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Log file path
    pub log_file: Option<PathBuf>,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Print the pass report after --once (text or json)
    #[arg(long, requires = "once", value_parser = ["text", "json"])]
    pub report: Option<String>,

    /// Create a missing replica folder without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Descend through symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log to the file only, not the console
    #[arg(long)]
    pub quiet: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

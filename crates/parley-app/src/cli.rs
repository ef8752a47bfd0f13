use std::path::PathBuf;

use clap::Parser;

/// Translate chat messages read as JSON lines from stdin
#[derive(Debug, Parser)]
#[command(name = "parley", version)]
pub struct Cli {
    /// Target language for this session (persisted)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Directory for persisted settings and cache
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep settings and cache in memory only
    #[arg(long)]
    pub in_memory: bool,

    /// Drop every cached translation before starting
    #[arg(long)]
    pub clear_cache: bool,

    /// Print cache statistics and exit
    #[arg(long)]
    pub stats: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

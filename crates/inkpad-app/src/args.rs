//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Replay a script of whiteboard actions and write the exported files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file holding an array of UI actions
    #[arg(help = "Path to the action script")]
    pub script: PathBuf,

    /// Directory exported files are written to
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

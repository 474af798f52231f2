//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::config::OutputFormat;

/// Computer club day simulator.
///
/// Replays one business day of a pay-per-hour computer club from a day
/// description file and prints the event log and per-table revenue.
#[derive(Debug, Parser)]
#[command(name = "club", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format, overriding the configured one.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Day description file, or `-` to read standard input.
    pub input: PathBuf,
}

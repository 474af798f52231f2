use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use club_cli::commands::run;
use club_cli::{Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout carries only the report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let format = cli.format.unwrap_or(config.format);
    let mut stdout = std::io::stdout().lock();
    run::run(&mut stdout, &cli.input, format)
}

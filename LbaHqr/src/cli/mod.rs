//! `LbaHqr` CLI - Command-line interface for LBA2 archive tools

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lbahqr")]
#[command(about = "LbaHqr: Little Big Adventure 2 archive tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Log decoder details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the `LbaHqr` CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "lbahqr=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    cli.command.execute()?;

    Ok(())
}

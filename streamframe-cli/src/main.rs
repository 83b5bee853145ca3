//! streamframe command-line entry point

use anyhow::Result;
use clap::Parser;
use streamframe_cli::commands::Commands;

/// Decode delimited log streams into flushable batches
#[derive(Debug, Parser)]
#[command(name = "streamframe", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    Cli::parse().command.execute()
}

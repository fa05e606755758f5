//! Tally CLI - Personal finance assistant
//!
//! Usage:
//!   tally categorize "STARBUCKS #4521" --amount 5.75
//!   tally categorize --file transactions.csv
//!   tally suggest chipotle
//!   tally ask "how much should I save for emergencies"
//!   tally status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use tally_core::Categorizer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let categorizer = Categorizer::from_config()?;

    match cli.command {
        Commands::Categorize {
            text,
            amount,
            merchant,
            note,
            file,
        } => match (text, file) {
            (_, Some(path)) => commands::cmd_categorize_file(&categorizer, &path, cli.json),
            (Some(text), None) => commands::cmd_categorize(
                &categorizer,
                &text,
                amount,
                merchant.as_deref(),
                note.as_deref(),
                cli.json,
            ),
            (None, None) => bail!("Provide a transaction description or --file"),
        },
        Commands::Suggest { merchant } => commands::cmd_suggest(&categorizer, &merchant, cli.json),
        Commands::Ask { query, limit } => commands::cmd_ask(&query, limit, cli.json).await,
        Commands::Status => commands::cmd_status(&categorizer, cli.json).await,
    }
}

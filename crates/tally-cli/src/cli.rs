//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal finance assistant: categorize transactions, search knowledge")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorize a transaction (or a CSV of them)
    Categorize {
        /// Transaction description, e.g. "STARBUCKS #4521"
        text: Option<String>,

        /// Signed amount (negative = money in)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        amount: f64,

        /// Merchant name, if known
        #[arg(long)]
        merchant: Option<String>,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,

        /// CSV file with name,merchant_name,description,amount columns
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Suggest candidate categories for a merchant name
    Suggest {
        /// Merchant name, e.g. "chipotle"
        merchant: String,
    },

    /// Search the knowledge corpus for relevant context
    Ask {
        /// Free-text question
        query: String,

        /// Maximum number of documents to return
        #[arg(short = 'k', long, default_value_t = 3)]
        limit: usize,
    },

    /// Show embedding backend and category table status
    Status,
}

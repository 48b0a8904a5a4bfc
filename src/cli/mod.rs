pub mod formats;
pub mod import;
pub mod init;
pub mod preview;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "extrato", about = "Bank-statement import CLI for Brazilian personal finance.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up extrato: choose a data directory and initialize the database.
    Init {
        /// Path for extrato data (default: ~/Documents/extrato)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a statement file: detect its format, parse, store transactions.
    Import {
        /// Path to the statement CSV file
        file: String,
        /// Format id (e.g. nubank, itau); auto-detected when omitted
        #[arg(long)]
        format: Option<String>,
    },
    /// Parse a statement file and show the result without storing anything.
    Preview {
        /// Path to the statement CSV file
        file: String,
        /// Format id; auto-detected when omitted
        #[arg(long)]
        format: Option<String>,
    },
    /// List the supported statement formats.
    Formats,
    /// Show current database and summary statistics.
    Status,
}

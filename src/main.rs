mod cli;
mod db;
mod error;
mod events;
mod fmt;
mod formats;
mod importer;
mod models;
mod normalize;
mod parser;
mod reporter;
mod settings;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file, format } => cli::import::run(&file, format.as_deref()),
        Commands::Preview { file, format } => cli::preview::run(&file, format.as_deref()),
        Commands::Formats => cli::formats::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

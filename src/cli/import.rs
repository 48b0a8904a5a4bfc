use std::path::PathBuf;

use colored::Colorize;

use crate::db::get_connection;
use crate::error::Result;
use crate::events::{EventBus, ImportEvent};
use crate::importer::import_file;
use crate::reporter::{self, DB_FILE};
use crate::settings::get_data_dir;

pub fn run(file: &str, format: Option<&str>) -> Result<()> {
    let file_path = PathBuf::from(file);
    let data_dir = get_data_dir();
    let conn = get_connection(&data_dir.join(DB_FILE))?;

    let mut bus = EventBus::new();
    bus.subscribe(|event| {
        if let ImportEvent::Started { filename } = event {
            println!("Importing {filename}...");
        }
    });

    let outcome = match import_file(&conn, &file_path, format, &bus) {
        Ok(outcome) => outcome,
        Err(e) => {
            // Whole-file failure: keep a copy for support review, then
            // surface the error to the user.
            bus.publish(&ImportEvent::Failed {
                filename: file.to_string(),
                reason: e.to_string(),
            });
            reporter::report_failure(&data_dir, &file_path, &e.to_string(), 0);
            eprintln!("{} saved a copy for review under failed/", "note:".yellow());
            return Err(e);
        }
    };

    if outcome.duplicate_file {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }

    println!(
        "{} [{}] {} imported, {} duplicates skipped",
        "Done.".green(),
        outcome.format_id,
        outcome.imported,
        outcome.skipped_duplicates
    );

    if !outcome.row_errors.is_empty() {
        println!(
            "{} {} row(s) could not be parsed:",
            "warning:".yellow(),
            outcome.row_errors.len()
        );
        for err in &outcome.row_errors {
            println!("  line {}: {} ({})", err.row_index, err.reason, err.raw_line.trim());
        }
        reporter::report_failure(
            &data_dir,
            &file_path,
            &format!("{} rows failed to parse", outcome.row_errors.len()),
            outcome.row_errors.len(),
        );
    }

    Ok(())
}

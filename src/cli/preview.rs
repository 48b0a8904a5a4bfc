use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::importer::resolve_format;
use crate::parser::parse;

/// Parse a statement and render the review table. Touches no database —
/// same inputs, same output, nothing stored.
pub fn run(file: &str, format: Option<&str>) -> Result<()> {
    let file_path = PathBuf::from(file);
    let content = std::fs::read_to_string(&file_path)?;
    let entry = resolve_format(&file_path, &content, format)?;
    let outcome = parse(&content, entry)?;

    println!("Format: {} ({})", entry.display_name, entry.id);

    let mut table = Table::new();
    table.set_header(vec!["Line", "Date", "Description", "Amount", "Kind"]);
    for txn in &outcome.transactions {
        table.add_row(vec![
            Cell::new(txn.source_row_index),
            Cell::new(&txn.date),
            Cell::new(&txn.description),
            Cell::new(money(txn.amount)),
            Cell::new(txn.kind.as_str()),
        ]);
    }
    println!("{table}");
    println!("{} transaction(s) parsed", outcome.transactions.len());

    if !outcome.errors.is_empty() {
        println!(
            "{} {} row(s) skipped:",
            "warning:".yellow(),
            outcome.errors.len()
        );
        for err in &outcome.errors {
            println!("  line {}: {} ({})", err.row_index, err.reason, err.raw_line.trim());
        }
    }

    Ok(())
}

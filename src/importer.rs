use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::error::{ExtratoError, Result};
use crate::events::{EventBus, ImportEvent};
use crate::formats::{self, FormatEntry};
use crate::models::{NormalizedTransaction, RowError};
use crate::parser;

pub fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn is_duplicate_row(conn: &Connection, txn: &NormalizedTransaction) -> Result<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM transactions WHERE date = ?1 AND amount = ?2 AND description = ?3",
    )?;
    Ok(stmt.exists(rusqlite::params![txn.date, txn.amount, txn.description])?)
}

pub struct ImportOutcome {
    pub format_id: &'static str,
    pub imported: usize,
    /// Rows skipped because an identical transaction already exists.
    pub skipped_duplicates: usize,
    /// Rows the parser could not normalize.
    pub row_errors: Vec<RowError>,
    pub duplicate_file: bool,
}

/// Resolve the format for a statement file: explicit key if the user gave
/// one, otherwise detection against the registry (generic as fallback).
pub fn resolve_format(
    file_path: &Path,
    content: &str,
    format_key: Option<&str>,
) -> Result<&'static FormatEntry> {
    if let Some(key) = format_key {
        return formats::get_by_id(key).ok_or_else(|| ExtratoError::UnknownFormat(key.to_string()));
    }
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let sample = formats::content_sample(content);
    Ok(formats::detect_format(file_name, &sample))
}

/// Import a statement file: detect format, parse, insert non-duplicate
/// rows, record the batch. Row-level parse failures come back in the
/// outcome; only whole-file problems (empty file, unknown separator,
/// unreadable file, database errors) are returned as errors.
pub fn import_file(
    conn: &Connection,
    file_path: &Path,
    format_key: Option<&str>,
    bus: &EventBus,
) -> Result<ImportOutcome> {
    let filename = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();
    bus.publish(&ImportEvent::Started {
        filename: filename.clone(),
    });

    let content = std::fs::read_to_string(file_path)?;
    let entry = resolve_format(file_path, &content, format_key)?;

    let checksum = compute_checksum(file_path)?;
    {
        let mut stmt = conn.prepare("SELECT 1 FROM imports WHERE checksum = ?1")?;
        if stmt.exists([&checksum])? {
            return Ok(ImportOutcome {
                format_id: entry.id,
                imported: 0,
                skipped_duplicates: 0,
                row_errors: Vec::new(),
                duplicate_file: true,
            });
        }
    }
    let outcome = parser::parse(&content, entry)?;

    let import_id: i64 = {
        let dates: Vec<&str> = outcome.transactions.iter().map(|t| t.date.as_str()).collect();
        conn.execute(
            "INSERT INTO imports (filename, format_id, record_count, skipped_rows, date_range_start, date_range_end, checksum) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                filename,
                entry.id,
                outcome.transactions.len() as i64,
                outcome.errors.len() as i64,
                dates.iter().min().copied(),
                dates.iter().max().copied(),
                checksum,
            ],
        )?;
        conn.last_insert_rowid()
    };

    let mut imported = 0usize;
    let mut skipped_duplicates = 0usize;
    for txn in &outcome.transactions {
        if is_duplicate_row(conn, txn)? {
            skipped_duplicates += 1;
            continue;
        }
        conn.execute(
            "INSERT INTO transactions (date, description, amount, kind, source_row, import_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                txn.date,
                txn.description,
                txn.amount,
                txn.kind.as_str(),
                txn.source_row_index as i64,
                import_id,
            ],
        )?;
        imported += 1;
    }

    bus.publish(&ImportEvent::Completed {
        filename,
        imported,
        skipped_rows: outcome.errors.len(),
    });

    Ok(ImportOutcome {
        format_id: entry.id,
        imported,
        skipped_duplicates,
        row_errors: outcome.errors,
        duplicate_file: false,
    })
}

//! Best-effort failure reporter: keeps a copy of statements that could not
//! be parsed so support can inspect them later. Nothing in here is allowed
//! to propagate back into the import flow; every failure is reduced to an
//! operator log line.

use std::path::Path;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::importer::compute_checksum;

pub const DB_FILE: &str = "extrato.db";

fn save_failed_file(data_dir: &Path, source_path: &Path, summary: &str, error_count: usize) -> Result<()> {
    let failed_dir = data_dir.join("failed");
    std::fs::create_dir_all(&failed_dir)?;

    let filename = source_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("statement.csv");
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let saved_as = failed_dir.join(format!("{stamp}-{filename}"));
    std::fs::copy(source_path, &saved_as)?;

    let checksum = compute_checksum(source_path)?;
    let conn = get_connection(&data_dir.join(DB_FILE))?;
    init_db(&conn)?;
    conn.execute(
        "INSERT INTO failed_imports (filename, saved_as, checksum, error_count, summary) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            filename,
            saved_as.to_string_lossy(),
            checksum,
            error_count as i64,
            summary,
        ],
    )?;
    Ok(())
}

/// Hand a failed statement to the reporter. Cannot fail from the caller's
/// point of view: internal errors are swallowed at this boundary.
pub fn report_failure(data_dir: &Path, source_path: &Path, summary: &str, error_count: usize) {
    if let Err(e) = save_failed_file(data_dir, source_path, summary, error_count) {
        eprintln!("warning: could not save failed statement for review: {e}");
    }
}

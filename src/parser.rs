use crate::error::{ExtratoError, Result};
use crate::formats::FormatEntry;
use crate::models::{NormalizedTransaction, ParseOutcome, RowError, TransactionKind};

const SNIFF_SEPARATORS: &[char] = &[',', ';', '\t'];

/// Count candidate separators in the first data line and pick the most
/// frequent. Earlier candidates win ties.
fn sniff_separator(line: &str) -> Option<char> {
    let mut best: Option<(char, usize)> = None;
    for &sep in SNIFF_SEPARATORS {
        let count = line.matches(sep).count();
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((sep, count));
        }
    }
    best.map(|(sep, _)| sep)
}

/// Explicit kind markers as they appear in bank exports with a
/// credit/debit column. Unrecognized markers return None and the caller
/// falls back to sign inference.
fn kind_from_marker(cell: &str) -> Option<TransactionKind> {
    let marker = cell.trim().to_lowercase();
    if marker == "c"
        || marker.starts_with("cr\u{e9}dito")
        || marker.starts_with("credito")
        || marker.starts_with("entrada")
    {
        Some(TransactionKind::Receipt)
    } else if marker == "d"
        || marker.starts_with("d\u{e9}bito")
        || marker.starts_with("debito")
        || marker.starts_with("sa\u{ed}da")
        || marker.starts_with("saida")
    {
        Some(TransactionKind::Expense)
    } else {
        None
    }
}

/// Parse raw statement content with a resolved format entry.
///
/// Row-level problems (unparseable date or amount, missing columns) are
/// isolated as `RowError`s and never abort the file. The whole operation
/// fails only for empty content or when no separator can be determined.
/// Pure: same inputs always produce the same outcome.
pub fn parse(content: &str, entry: &FormatEntry) -> Result<ParseOutcome> {
    if content.trim().is_empty() {
        return Err(ExtratoError::EmptyStatement);
    }

    let separator = match entry.field_separator {
        Some(sep) => sep,
        None => {
            let first_line = content
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("");
            sniff_separator(first_line).ok_or(ExtratoError::SeparatorUndetected)?
        }
    };

    let source_lines: Vec<&str> = content.lines().collect();
    let raw_line = |line: u64| -> String {
        source_lines
            .get(line.saturating_sub(1) as usize)
            .map(|l| l.to_string())
            .unwrap_or_default()
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator as u8)
        .from_reader(content.as_bytes());

    let mut outcome = ParseOutcome::default();
    let mut at_first_row = true;

    for (fallback_index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(_) => continue,
        };
        let line = record
            .position()
            .map(|pos| pos.line())
            .unwrap_or(fallback_index as u64 + 1);
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        if at_first_row {
            at_first_row = false;
            if entry.has_header_row {
                continue;
            }
            // The generic entry cannot know whether the file carries a
            // header; a leading row whose date cell does not normalize is
            // treated as one and skipped.
            if entry.is_generic() {
                let looks_like_header = record
                    .get(entry.columns.date)
                    .map_or(true, |cell| (entry.date_normalizer)(cell).is_none());
                if looks_like_header {
                    continue;
                }
            }
        }

        let Some(date_cell) = record.get(entry.columns.date) else {
            outcome.errors.push(RowError {
                row_index: line,
                raw_line: raw_line(line),
                reason: format!("missing date column {}", entry.columns.date),
            });
            continue;
        };
        let Some(amount_cell) = record.get(entry.columns.amount) else {
            outcome.errors.push(RowError {
                row_index: line,
                raw_line: raw_line(line),
                reason: format!("missing amount column {}", entry.columns.amount),
            });
            continue;
        };

        let Some(date) = (entry.date_normalizer)(date_cell) else {
            outcome.errors.push(RowError {
                row_index: line,
                raw_line: raw_line(line),
                reason: format!("unparseable date: {:?}", date_cell.trim()),
            });
            continue;
        };
        let Some(mut amount) = (entry.amount_normalizer)(amount_cell) else {
            outcome.errors.push(RowError {
                row_index: line,
                raw_line: raw_line(line),
                reason: format!("unparseable amount: {:?}", amount_cell.trim()),
            });
            continue;
        };

        let description = entry
            .columns
            .description
            .and_then(|idx| record.get(idx))
            .unwrap_or("")
            .trim()
            .to_string();

        // Explicit kind column wins and forces the sign; otherwise the
        // sign decides the kind.
        let explicit_kind = entry
            .columns
            .kind
            .and_then(|idx| record.get(idx))
            .and_then(kind_from_marker);
        let kind = match explicit_kind {
            Some(TransactionKind::Expense) => {
                amount = -amount.abs();
                TransactionKind::Expense
            }
            Some(TransactionKind::Receipt) => {
                amount = amount.abs();
                TransactionKind::Receipt
            }
            None => TransactionKind::from_amount(amount),
        };

        outcome.transactions.push(NormalizedTransaction {
            date,
            description,
            amount,
            kind,
            source_row_index: line,
        });
    }

    Ok(outcome)
}

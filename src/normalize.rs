//! Cell normalizers: raw column text -> ISO date or signed decimal.
//! All of them return `None` on failure so the parser can isolate bad rows.

fn assemble(y: i32, m: u32, d: u32) -> Option<String> {
    chrono::NaiveDate::from_ymd_opt(y, m, d).map(|dt| dt.format("%Y-%m-%d").to_string())
}

fn split_date(raw: &str, sep: char) -> Option<(u32, u32, i32)> {
    let parts: Vec<&str> = raw.trim().split(sep).collect();
    if parts.len() != 3 {
        return None;
    }
    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    let c: i32 = parts[2].parse().ok()?;
    Some((a, b, c))
}

/// Fixed convention: `DD/MM/YYYY` only.
pub fn date_dmy_slash(raw: &str) -> Option<String> {
    let (d, m, y) = split_date(raw, '/')?;
    assemble(y, m, d)
}

/// Fixed convention: ISO `YYYY-MM-DD` only.
pub fn date_iso(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.trim().split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let y: i32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    let d: u32 = parts[2].parse().ok()?;
    assemble(y, m, d)
}

/// Fixed convention: `DD.MM.YYYY` only.
pub fn date_dmy_dots(raw: &str) -> Option<String> {
    let (d, m, y) = split_date(raw, '.')?;
    assemble(y, m, d)
}

/// Generic date sniffer: `DD/MM/YYYY`, then `YYYY-MM-DD`, then `DD.MM.YYYY`.
/// First pattern that yields a real calendar date wins.
pub fn date_flexible(raw: &str) -> Option<String> {
    date_dmy_slash(raw)
        .or_else(|| date_iso(raw))
        .or_else(|| date_dmy_dots(raw))
}

/// Strip currency symbols, whitespace and quotes; unwrap accounting-style
/// parentheses. Returns the bare numeric fragment and whether it was
/// parenthesized (negative).
fn strip_amount(raw: &str) -> (String, bool) {
    let s = raw
        .replace("R$", "")
        .replace('$', "")
        .replace('"', "")
        .replace('\u{a0}', " ")
        .replace(' ', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        (inner.to_string(), true)
    } else {
        (s.to_string(), false)
    }
}

/// Fixed convention: decimal comma, dot as thousands separator
/// (`1.234,56` -> 1234.56). The common Brazilian bank export style.
pub fn amount_comma_decimal(raw: &str) -> Option<f64> {
    let (s, neg) = strip_amount(raw);
    let s = s.replace('.', "").replace(',', ".");
    let value: f64 = s.parse().ok()?;
    Some(if neg { -value.abs() } else { value })
}

/// Fixed convention: decimal dot, comma as thousands separator
/// (`1,234.56` -> 1234.56).
pub fn amount_dot_decimal(raw: &str) -> Option<f64> {
    let (s, neg) = strip_amount(raw);
    let s = s.replace(',', "");
    let value: f64 = s.parse().ok()?;
    Some(if neg { -value.abs() } else { value })
}

/// Generic amount sniffer. Disambiguation rules:
/// - both `,` and `.` present: the rightmost one is the decimal separator,
///   the other is a thousands separator and is stripped;
/// - only `,` present: a single comma followed by 1-2 digits is a decimal
///   separator, anything else is thousands grouping.
pub fn amount_flexible(raw: &str) -> Option<f64> {
    let (s, neg) = strip_amount(raw);
    let comma = s.rfind(',');
    let dot = s.rfind('.');

    let s = match (comma, dot) {
        (Some(c), Some(d)) => {
            if c > d {
                s.replace('.', "").replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        (Some(_), None) => {
            let commas = s.matches(',').count();
            let after = s.rsplit(',').next().unwrap_or("");
            if commas == 1 && (1..=2).contains(&after.len()) {
                s.replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        _ => s,
    };

    let value: f64 = s.parse().ok()?;
    Some(if neg { -value.abs() } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_flexible_accepts_three_layouts() {
        assert_eq!(date_flexible("31/12/2023"), Some("2023-12-31".to_string()));
        assert_eq!(date_flexible("2023-12-31"), Some("2023-12-31".to_string()));
        assert_eq!(date_flexible("31.12.2023"), Some("2023-12-31".to_string()));
    }

    #[test]
    fn test_date_flexible_rejects_impossible_dates() {
        assert_eq!(date_flexible("13/13/2023"), None); // month 13
        assert_eq!(date_flexible("30/02/2024"), None); // Feb 30
        assert_eq!(date_flexible("not a date"), None);
        assert_eq!(date_flexible(""), None);
    }

    #[test]
    fn test_date_fixed_parsers_do_not_sniff() {
        assert_eq!(date_dmy_slash("2023-12-31"), None);
        assert_eq!(date_iso("31/12/2023"), None);
        assert_eq!(date_dmy_dots("31/12/2023"), None);
    }

    #[test]
    fn test_amount_flexible_locale_sniffing() {
        assert_eq!(amount_flexible("R$ 1.234,56"), Some(1234.56));
        assert_eq!(amount_flexible("1,234.56"), Some(1234.56));
        assert_eq!(amount_flexible("(50,00)"), Some(-50.0));
        assert_eq!(amount_flexible("-20,00"), Some(-20.0));
    }

    #[test]
    fn test_amount_flexible_comma_only_heuristic() {
        // single comma with 1-2 trailing digits reads as decimal
        assert_eq!(amount_flexible("5,5"), Some(5.5));
        // more than 2 trailing digits reads as thousands grouping
        assert_eq!(amount_flexible("1,234"), Some(1234.0));
        assert_eq!(amount_flexible("1,234,567"), Some(1234567.0));
    }

    #[test]
    fn test_amount_flexible_rejects_garbage() {
        assert_eq!(amount_flexible("abc"), None);
        assert_eq!(amount_flexible(""), None);
        assert_eq!(amount_flexible("12,34,56.7.8"), None);
    }

    #[test]
    fn test_amount_comma_decimal() {
        assert_eq!(amount_comma_decimal("1.234,56"), Some(1234.56));
        assert_eq!(amount_comma_decimal("R$ -150,00"), Some(-150.0));
        assert_eq!(amount_comma_decimal("(89,90)"), Some(-89.9));
        assert_eq!(amount_comma_decimal("saldo"), None);
    }

    #[test]
    fn test_amount_dot_decimal() {
        assert_eq!(amount_dot_decimal("1,234.56"), Some(1234.56));
        assert_eq!(amount_dot_decimal("\"2,000.00\""), Some(2000.0));
        assert_eq!(amount_dot_decimal("-42.50"), Some(-42.5));
        assert_eq!(amount_dot_decimal("(500.00)"), Some(-500.0));
        assert_eq!(amount_dot_decimal("x"), None);
    }
}

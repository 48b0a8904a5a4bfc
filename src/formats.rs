use std::sync::OnceLock;

use regex::Regex;

use crate::normalize;

pub const GENERIC_ID: &str = "generic";

/// Zero-based column positions for the logical fields of a statement row.
/// `description` and `kind` may be absent from the source; a missing kind
/// is inferred from the amount sign at parse time.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pub date: usize,
    pub description: Option<usize>,
    pub amount: usize,
    pub kind: Option<usize>,
}

/// Static per-institution configuration: how to recognize one bank's export
/// and how to read its columns. Defined once at startup, immutable after.
pub struct FormatEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Case-insensitive substrings matched against file name or content.
    pub detection_keywords: &'static [&'static str],
    /// Regexes matched against the content sample when keywords miss.
    pub detection_patterns: Vec<Regex>,
    /// `None` means sniff at parse time (generic entry only).
    pub field_separator: Option<char>,
    pub has_header_row: bool,
    pub columns: ColumnMap,
    pub date_normalizer: fn(&str) -> Option<String>,
    pub amount_normalizer: fn(&str) -> Option<f64>,
}

impl FormatEntry {
    pub fn is_generic(&self) -> bool {
        self.id == GENERIC_ID
    }

    fn matches(&self, file_name_lower: &str, sample_lower: &str, sample: &str) -> bool {
        if self
            .detection_keywords
            .iter()
            .any(|kw| file_name_lower.contains(kw) || sample_lower.contains(kw))
        {
            return true;
        }
        self.detection_patterns.iter().any(|re| re.is_match(sample))
    }
}

fn pattern(re: &str) -> Regex {
    // Patterns are fixed literals in this table; a typo is a programmer
    // error, caught by the registry tests.
    Regex::new(re).unwrap_or_else(|e| panic!("bad detection pattern {re}: {e}"))
}

fn build_registry() -> Vec<FormatEntry> {
    vec![
        // Nubank: Data,Valor,Identificador,Descrição — dot-decimal amounts.
        FormatEntry {
            id: "nubank",
            display_name: "Nubank",
            detection_keywords: &["nubank"],
            detection_patterns: vec![pattern(r"(?i)identificador")],
            field_separator: Some(','),
            has_header_row: true,
            columns: ColumnMap {
                date: 0,
                description: Some(3),
                amount: 1,
                kind: None,
            },
            date_normalizer: normalize::date_dmy_slash,
            amount_normalizer: normalize::amount_dot_decimal,
        },
        // Itaú: headerless semicolon rows — data;lançamento;valor.
        FormatEntry {
            id: "itau",
            display_name: "Itaú",
            detection_keywords: &["itau", "ita\u{fa}"],
            detection_patterns: vec![],
            field_separator: Some(';'),
            has_header_row: false,
            columns: ColumnMap {
                date: 0,
                description: Some(1),
                amount: 2,
                kind: None,
            },
            date_normalizer: normalize::date_dmy_slash,
            amount_normalizer: normalize::amount_comma_decimal,
        },
        // Bradesco: Data;Lançamento;Documento;Valor;Saldo.
        FormatEntry {
            id: "bradesco",
            display_name: "Bradesco",
            detection_keywords: &["bradesco"],
            detection_patterns: vec![pattern(r"(?i)data;lan[c\u{e7}]amento;documento")],
            field_separator: Some(';'),
            has_header_row: true,
            columns: ColumnMap {
                date: 0,
                description: Some(1),
                amount: 3,
                kind: None,
            },
            date_normalizer: normalize::date_dmy_slash,
            amount_normalizer: normalize::amount_comma_decimal,
        },
        // Banco do Brasil: the only catalog entry with an explicit kind
        // column — Data,Lançamento,Detalhes,Documento,Valor,Tipo Lançamento.
        FormatEntry {
            id: "banco_do_brasil",
            display_name: "Banco do Brasil",
            detection_keywords: &["banco do brasil", "extrato_bb"],
            detection_patterns: vec![pattern(r"(?i)tipo lan[c\u{e7}]amento")],
            field_separator: Some(','),
            has_header_row: true,
            columns: ColumnMap {
                date: 0,
                description: Some(2),
                amount: 4,
                kind: Some(5),
            },
            date_normalizer: normalize::date_dmy_slash,
            amount_normalizer: normalize::amount_comma_decimal,
        },
        // Santander: Data;Histórico;Documento;Valor;Saldo.
        FormatEntry {
            id: "santander",
            display_name: "Santander",
            detection_keywords: &["santander"],
            detection_patterns: vec![pattern(r"(?i)data;hist[o\u{f3}]rico;documento")],
            field_separator: Some(';'),
            has_header_row: true,
            columns: ColumnMap {
                date: 0,
                description: Some(1),
                amount: 3,
                kind: None,
            },
            date_normalizer: normalize::date_dmy_slash,
            amount_normalizer: normalize::amount_comma_decimal,
        },
        // Banco Inter: Data Lançamento;Descrição;Valor;Saldo.
        FormatEntry {
            id: "inter",
            display_name: "Banco Inter",
            detection_keywords: &["banco inter", "extrato-inter"],
            detection_patterns: vec![pattern(r"(?i)data lan[c\u{e7}]amento")],
            field_separator: Some(';'),
            has_header_row: true,
            columns: ColumnMap {
                date: 0,
                description: Some(1),
                amount: 2,
                kind: None,
            },
            date_normalizer: normalize::date_dmy_slash,
            amount_normalizer: normalize::amount_comma_decimal,
        },
        // Generic fallback: separator sniffed at parse time, locale-sniffing
        // normalizers, date/description/amount assumed in the first columns.
        FormatEntry {
            id: GENERIC_ID,
            display_name: "Generic CSV",
            detection_keywords: &[],
            detection_patterns: vec![],
            field_separator: None,
            has_header_row: false,
            columns: ColumnMap {
                date: 0,
                description: Some(1),
                amount: 2,
                kind: None,
            },
            date_normalizer: normalize::date_flexible,
            amount_normalizer: normalize::amount_flexible,
        },
    ]
}

/// Registry order is the detection tie-break: institution entries first,
/// the generic entry last.
pub fn registry() -> &'static [FormatEntry] {
    static REGISTRY: OnceLock<Vec<FormatEntry>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

pub fn get_by_id(id: &str) -> Option<&'static FormatEntry> {
    registry().iter().find(|entry| entry.id == id)
}

pub fn generic() -> &'static FormatEntry {
    registry()
        .iter()
        .find(|entry| entry.is_generic())
        .expect("registry always contains the generic entry")
}

/// First N non-empty lines of the content, enough to see the separator and
/// a few data rows.
pub fn content_sample(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(5)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick the best-matching entry for a candidate file. First registry entry
/// whose keywords hit the file name or sample (or whose patterns hit the
/// sample) wins; no match falls back to the generic entry.
pub fn detect_format(file_name: &str, content_sample: &str) -> &'static FormatEntry {
    let file_name_lower = file_name.to_lowercase();
    let sample_lower = content_sample.to_lowercase();
    registry()
        .iter()
        .filter(|entry| !entry.is_generic())
        .find(|entry| entry.matches(&file_name_lower, &sample_lower, content_sample))
        .unwrap_or_else(generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_shape() {
        let generics: Vec<_> = registry().iter().filter(|e| e.is_generic()).collect();
        assert_eq!(generics.len(), 1);
        assert!(generics[0].field_separator.is_none());
        for entry in registry().iter().filter(|e| !e.is_generic()) {
            assert!(
                !entry.detection_keywords.is_empty() || !entry.detection_patterns.is_empty(),
                "{} has no detection rules",
                entry.id
            );
            assert!(entry.field_separator.is_some(), "{} must fix a separator", entry.id);
        }
    }

    #[test]
    fn test_detect_by_filename_keyword() {
        let entry = detect_format("nubank-2024-03.csv", "");
        assert_eq!(entry.id, "nubank");
        let entry = detect_format("extrato_bb_marco.csv", "");
        assert_eq!(entry.id, "banco_do_brasil");
    }

    #[test]
    fn test_detect_by_content_keyword() {
        let sample = "Extrato Conta Corrente - Banco Santander\nData;Hist\u{f3}rico;Documento;Valor;Saldo";
        assert_eq!(detect_format("export.csv", sample).id, "santander");
    }

    #[test]
    fn test_detect_by_pattern_when_keywords_miss() {
        let sample = "Data,Valor,Identificador,Descri\u{e7}\u{e3}o\n01/03/2024,-25.90,abc123,iFood";
        assert_eq!(detect_format("statement.csv", sample).id, "nubank");

        let sample = "Data Lan\u{e7}amento;Descri\u{e7}\u{e3}o;Valor;Saldo";
        assert_eq!(detect_format("movimentos.csv", sample).id, "inter");
    }

    #[test]
    fn test_detect_falls_back_to_generic() {
        let entry = detect_format("statement.csv", "date,description,amount\n2024-01-01,Coffee,-4.50");
        assert!(entry.is_generic());
        assert!(detect_format("", "").is_generic());
    }

    #[test]
    fn test_registry_order_breaks_ties() {
        // A file mentioning two institutions resolves to the earlier entry.
        let sample = "nubank itau";
        assert_eq!(detect_format("", sample).id, "nubank");
    }

    #[test]
    fn test_content_sample_takes_first_five_nonempty() {
        let content = "a\n\nb\nc\n\nd\ne\nf\n";
        assert_eq!(content_sample(content), "a\nb\nc\nd\ne");
        assert_eq!(content_sample("only\n"), "only");
    }

    #[test]
    fn test_get_by_id() {
        assert_eq!(get_by_id("bradesco").map(|e| e.display_name), Some("Bradesco"));
        assert!(get_by_id("acme").is_none());
    }
}

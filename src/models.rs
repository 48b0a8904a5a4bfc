/// Direction of a transaction: money in (receipt) or money out (expense).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Receipt,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Expense => "expense",
        }
    }

    /// Sign convention: negative = money out.
    pub fn from_amount(amount: f64) -> Self {
        if amount < 0.0 {
            Self::Expense
        } else {
            Self::Receipt
        }
    }
}

/// One successfully normalized statement row.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTransaction {
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    /// Trimmed free text; may be empty.
    pub description: String,
    /// Signed decimal; negative = money out.
    pub amount: f64,
    pub kind: TransactionKind,
    /// 1-based physical line in the source file.
    pub source_row_index: u64,
}

/// A row whose date or amount could not be normalized. Isolated from the
/// rest of the file; never aborts the parse.
#[derive(Debug, Clone)]
pub struct RowError {
    pub row_index: u64,
    pub raw_line: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub transactions: Vec<NormalizedTransaction>,
    pub errors: Vec<RowError>,
}

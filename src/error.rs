use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtratoError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Statement file is empty")]
    EmptyStatement,

    #[error("Could not determine a field separator from the file content")]
    SeparatorUndetected,

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ExtratoError>;

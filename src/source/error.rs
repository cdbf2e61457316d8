//! Error types for ticket sources.

use thiserror::Error;

/// Errors that can occur while reading a ticket spreadsheet.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be opened or read.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension is not a known spreadsheet format.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Both spreadsheet engines rejected the file.
    #[error("Parse error: {primary}; fallback engine: {fallback}")]
    Spreadsheet { primary: String, fallback: String },

    /// The workbook could not be parsed.
    #[error("Parse error: {0}")]
    Workbook(String),

    /// The CSV file could not be parsed.
    #[error("Parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The first sheet has no header row.
    #[error("Parse error: sheet is empty")]
    EmptySheet,
}

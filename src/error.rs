use thiserror::Error;

use crate::convert::OutputFormat;
use crate::data::intake::SourceFormat;

/// Every failure a user action can surface in the UI.
#[derive(Debug, Error)]
pub enum SweepError {
    /// File name does not end in `.csv` or `.xlsx`.
    #[error("Unsupported file format: .{0}. Please upload a CSV or Excel file.")]
    UnsupportedFormat(String),

    #[error("Could not parse {format} data: {message}")]
    Parse { format: SourceFormat, message: String },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("PDF conversion is not available: install wkhtmltopdf (https://wkhtmltopdf.org/downloads.html)")]
    BackendUnavailable,

    #[error("PDF conversion failed: {0}")]
    Render(String),

    #[error("Could not write {format}: {message}")]
    Serialize { format: OutputFormat, message: String },

    #[error("Column '{column}' has {found} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SweepError {
    pub(crate) fn serialize(format: OutputFormat, err: impl std::fmt::Display) -> Self {
        SweepError::Serialize {
            format,
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = SweepError> = std::result::Result<T, E>;

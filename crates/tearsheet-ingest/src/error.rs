//! Error types for ingestion.

use thiserror::Error;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Dataset-level errors raised while detecting or normalizing a table.
///
/// Row-level problems are not errors: they are collected as
/// [`MalformedRow`](crate::normalize::MalformedRow) values and the row is skipped.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No usable date/value column pair could be identified.
    #[error("Cannot identify date and value columns among {columns:?} ({rows} rows)")]
    UnidentifiableColumns {
        /// Column names that were inspected
        columns: Vec<String>,
        /// Number of rows in the table
        rows: usize,
    },

    /// Too few usable points remained after parsing.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum number of points required
        required: usize,
        /// Number of usable points found
        actual: usize,
    },

    /// Dates and values of a series differ in length
    #[error("Length mismatch: {dates} dates vs {values} values")]
    LengthMismatch {
        /// Number of dates
        dates: usize,
        /// Number of values
        values: usize,
    },

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

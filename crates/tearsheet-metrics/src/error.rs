//! Error types for metric computation.

use thiserror::Error;

/// Result type for metric computation.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that can occur while computing a report.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Not enough returns for the report
    #[error("Insufficient data: need at least {required} returns, got {actual}")]
    InsufficientData {
        /// Required number of returns
        required: usize,
        /// Actual number of returns
        actual: usize,
    },

    /// Dates and returns are not paired 1:1
    #[error("Length mismatch: {dates} dates vs {returns} returns")]
    LengthMismatch {
        /// Number of dates
        dates: usize,
        /// Number of returns
        returns: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

//! Top-level error type.

use tearsheet_ingest::IngestError;
use tearsheet_metrics::MetricsError;
use tearsheet_output::ExportError;
use thiserror::Error;

/// Result type for the end-to-end pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure between raw input and a finished report.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading, detecting or normalizing the input failed
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Computing the report failed
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Writing the result failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

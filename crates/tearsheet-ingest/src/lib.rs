#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tearsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dates;
pub mod detect;
pub mod error;
pub mod market;
pub mod normalize;
pub mod numeric;
pub mod record;
pub mod series;
pub mod table;

pub use detect::{Detection, detect_columns};
pub use error::{IngestError, Result};
pub use normalize::{MalformedRow, NormalizedSeries, Normalizer, NormalizerConfig, normalize};
pub use record::{Cell, RawRecord};
pub use series::{PriceSeries, ReturnSeries, SeriesKind, TimeSeriesPoint};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use tearsheet_ingest::NormalizerConfig;
use tearsheet_metrics::MetricsConfig;

/// Configuration for [`analyze`](crate::analyze).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Metric parameters
    pub metrics: MetricsConfig,

    /// Minimum number of parsed rows (default: 2)
    pub min_points: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            metrics: MetricsConfig::default(),
            min_points: 2,
        }
    }
}

impl AnalysisConfig {
    /// Normalizer settings derived from this configuration.
    pub const fn normalizer(&self) -> NormalizerConfig {
        NormalizerConfig {
            min_points: self.min_points,
        }
    }
}

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tearsheet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calendar;
pub mod config;
pub mod drawdown;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod returns;
pub mod risk;
pub mod rolling;
pub mod stats;

pub use config::MetricsConfig;
pub use drawdown::DrawdownEpisode;
pub use error::{MetricsError, Result};
pub use orchestrator::{Analysis, Orchestrator};
pub use report::{MetricsReport, compute_report};
pub use rolling::RollingSharpe;

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

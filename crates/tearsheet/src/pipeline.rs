//! End-to-end analysis: records in, report out.

use crate::config::AnalysisConfig;
use crate::error::Result;
use std::io::Read;
use std::path::Path;
use tearsheet_ingest::market::{Bar, bars_to_prices};
use tearsheet_ingest::table::{read_csv, read_csv_path};
use tearsheet_ingest::{Detection, NormalizedSeries, Normalizer, RawRecord, detect_columns};
use tearsheet_metrics::{Analysis, Orchestrator};

/// Everything the pipeline learned about one dataset.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Columns and kind chosen by detection
    pub detection: Detection,
    /// Reconstructed series, including skipped rows
    pub series: NormalizedSeries,
    /// Report and aligned returns
    pub analysis: Analysis,
}

/// Detection, normalization and metrics wired together.
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: Normalizer,
    orchestrator: Orchestrator,
}

impl Pipeline {
    /// Build a pipeline, validating the configuration.
    ///
    /// # Errors
    /// Returns an error if the normalizer or metric settings are invalid.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new(config.normalizer())?,
            orchestrator: Orchestrator::new(config.metrics.clone())?,
        })
    }

    /// Analyze an in-memory table.
    ///
    /// # Errors
    /// Fails when no usable columns are found or when fewer than two rows
    /// survive parsing.
    pub fn run(&self, records: &[RawRecord]) -> Result<PipelineOutput> {
        let detection = detect_columns(records)?;
        let series = self.normalizer.normalize(records, &detection)?;
        let analysis = self.orchestrator.report(&series)?;

        tracing::info!(
            date_column = %detection.date_column,
            value_column = %detection.value_column,
            kind = %detection.kind,
            rows = records.len(),
            skipped = series.skipped.len(),
            returns = analysis.report.data_points,
            cumulative_return = analysis.report.cumulative_return,
            max_drawdown = analysis.report.max_drawdown,
            "analysis complete"
        );

        Ok(PipelineOutput {
            detection,
            series,
            analysis,
        })
    }

    /// Analyze CSV text read from `reader`.
    ///
    /// # Errors
    /// See [`Pipeline::run`]; also fails on malformed CSV.
    pub fn run_csv<R: Read>(&self, reader: R) -> Result<PipelineOutput> {
        self.run(&read_csv(reader)?)
    }

    /// Analyze a CSV file.
    ///
    /// # Errors
    /// See [`Pipeline::run_csv`]; also fails if the file cannot be opened.
    pub fn run_path(&self, path: impl AsRef<Path>) -> Result<PipelineOutput> {
        self.run(&read_csv_path(path)?)
    }

    /// Analyze the daily closes of market bars.
    ///
    /// # Errors
    /// Returns an error with fewer than two usable trading days.
    pub fn run_bars(&self, bars: &[Bar]) -> Result<Analysis> {
        let prices = bars_to_prices(bars);
        let analysis = self.orchestrator.report_prices(&prices)?;
        tracing::info!(
            bars = bars.len(),
            days = prices.len(),
            returns = analysis.report.data_points,
            "bar analysis complete"
        );
        Ok(analysis)
    }
}

/// Analyze `records` with `config`.
///
/// # Errors
/// See [`Pipeline::new`] and [`Pipeline::run`].
pub fn analyze(records: &[RawRecord], config: &AnalysisConfig) -> Result<PipelineOutput> {
    Pipeline::new(config)?.run(records)
}

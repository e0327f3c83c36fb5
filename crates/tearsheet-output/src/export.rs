//! CSV and JSON export of reports and return series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tearsheet_ingest::ReturnSeries;
use tearsheet_metrics::{Analysis, MetricsReport};
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One `metric,value` CSV row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricRow {
    /// camelCase metric name
    pub metric: String,
    /// Formatted value; unbounded values are `Infinity`
    pub value: String,
}

/// One dated daily return.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyReturnRow {
    /// Trailing date of the interval
    pub date: NaiveDate,
    /// Simple return of the interval
    #[serde(rename = "return", alias = "daily_return")]
    pub value: f64,
}

/// Flatten a report into `metric,value` rows, dates first.
pub fn metric_rows(report: &MetricsReport) -> Vec<MetricRow> {
    let dates = [
        ("startDate", report.start_date.to_string()),
        ("endDate", report.end_date.to_string()),
    ];
    dates
        .into_iter()
        .chain(
            report
                .metrics()
                .into_iter()
                .map(|(metric, value)| (metric, format_value(value))),
        )
        .map(|(metric, value)| MetricRow {
            metric: metric.to_string(),
            value,
        })
        .collect()
}

/// Dated rows of a return series.
pub fn return_rows(returns: &ReturnSeries) -> Vec<DailyReturnRow> {
    returns
        .iter()
        .map(|(date, value)| DailyReturnRow { date, value })
        .collect()
}

/// Plain decimal text for finite values, `Infinity` / `-Infinity` otherwise.
pub fn format_value(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

#[derive(Serialize)]
struct AnalysisDocument<'a> {
    report: &'a MetricsReport,
    #[serde(rename = "dailyReturns")]
    daily_returns: Vec<DailyReturnRow>,
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn csv_string<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn json_string<T: Serialize + ?Sized>(
    value: &T,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

impl Exporter for MetricsReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_string(metric_rows(self)),
            ExportFormat::Json | ExportFormat::PrettyJson => json_string(self, format),
        }
    }
}

impl Exporter for ReturnSeries {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(["date", "daily_return"])?;
                for (date, value) in self.iter() {
                    wtr.write_record([date.to_string(), value.to_string()])?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
            }
            ExportFormat::Json | ExportFormat::PrettyJson => {
                json_string(&return_rows(self), format)
            }
        }
    }
}

impl Exporter for Analysis {
    /// CSV carries the report only; export `self.returns` for the series.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => self.report.export_to_string(format),
            ExportFormat::Json | ExportFormat::PrettyJson => {
                let document = AnalysisDocument {
                    report: &self.report,
                    daily_returns: return_rows(&self.returns),
                };
                json_string(&document, format)
            }
        }
    }
}

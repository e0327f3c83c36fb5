//! Demonstration of the export functionality in tearsheet-output.

use chrono::{Duration, NaiveDate};
use tearsheet_ingest::{ReturnSeries, SeriesKind};
use tearsheet_metrics::{Analysis, MetricsConfig, compute_report};
use tearsheet_output::{ExportFormat, Exporter, Summary};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tearsheet Export Demo ===\n");

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let daily = [0.004, -0.012, 0.007, 0.015, -0.003, 0.001, -0.02, 0.011, 0.006, -0.004];
    let dates: Vec<NaiveDate> = (1..=daily.len() as i64)
        .map(|i| start + Duration::days(i))
        .collect();
    let terminal = dates[dates.len() - 1];
    let returns = ReturnSeries::new(dates, daily.to_vec())?;

    let config = MetricsConfig {
        as_of: Some(terminal),
        ..Default::default()
    };
    let report = compute_report(returns.returns(), returns.dates(), start, terminal, &config)?;
    let analysis = Analysis {
        kind: SeriesKind::DailyReturn,
        report,
        returns,
    };

    println!("1. Report as metric,value CSV\n");
    println!("{}", analysis.report.export_to_string(ExportFormat::Csv)?);

    println!("2. Daily returns CSV\n");
    println!("{}", analysis.returns.export_to_string(ExportFormat::Csv)?);

    println!("3. Full analysis as JSON\n");
    println!("{}\n", analysis.export_to_string(ExportFormat::PrettyJson)?);

    println!("4. Text summary");
    let summary = Summary::new("demo", &analysis, 0);
    println!("{}", summary.to_ascii_table());

    Ok(())
}

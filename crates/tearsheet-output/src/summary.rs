//! Human-readable rendering of a metrics report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tearsheet_ingest::SeriesKind;
use tearsheet_metrics::{Analysis, MetricsReport};

/// How a metric value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Percent,
    Ratio,
    Count,
    Years,
}

type Section = (&'static str, &'static [(&'static str, &'static str, Unit)]);

const SECTIONS: &[Section] = &[
    (
        "Returns",
        &[
            ("cumulativeReturn", "Cumulative Return", Unit::Percent),
            ("cagr", "CAGR", Unit::Percent),
            ("mtd", "MTD", Unit::Percent),
            ("return3M", "3M", Unit::Percent),
            ("return6M", "6M", Unit::Percent),
            ("ytd", "YTD", Unit::Percent),
        ],
    ),
    (
        "Risk",
        &[
            ("volatility", "Volatility (ann.)", Unit::Percent),
            ("var95", "Daily VaR 95%", Unit::Percent),
            ("var99Monthly", "Monthly VaR 99%", Unit::Percent),
            ("cvar95", "Daily CVaR 95%", Unit::Percent),
            ("cvar99", "Daily CVaR 99%", Unit::Percent),
        ],
    ),
    (
        "Drawdown",
        &[
            ("maxDrawdown", "Max Drawdown", Unit::Percent),
            ("durationOfMD", "Max Drawdown Span", Unit::Count),
            ("maxDrawdownDuration", "Longest Drawdown", Unit::Count),
            ("drawdownOfMDD", "Longest Drawdown Depth", Unit::Percent),
        ],
    ),
    (
        "Ratios",
        &[
            ("sharpeRatio", "Sharpe", Unit::Ratio),
            ("sortinoRatio", "Sortino", Unit::Ratio),
            ("calmarRatio", "Calmar", Unit::Ratio),
            ("omegaRatio", "Omega", Unit::Ratio),
            ("gainPainRatio", "Gain/Pain (1M)", Unit::Ratio),
            ("tailRatio", "Tail Ratio", Unit::Ratio),
            ("rollingSharpe90dMean", "Rolling Sharpe 90d Mean", Unit::Ratio),
            ("rollingSharpe90dMedian", "Rolling Sharpe 90d Median", Unit::Ratio),
            ("rollingSharpe90dLast", "Rolling Sharpe 90d Last", Unit::Ratio),
            ("rollingSharpe365dMean", "Rolling Sharpe 365d Mean", Unit::Ratio),
            ("rollingSharpe365dMedian", "Rolling Sharpe 365d Median", Unit::Ratio),
            ("rollingSharpe365dLast", "Rolling Sharpe 365d Last", Unit::Ratio),
        ],
    ),
    (
        "Distribution",
        &[
            ("giniCoefficient", "Gini", Unit::Ratio),
            ("skew", "Skew", Unit::Ratio),
            ("kurtosis", "Excess Kurtosis", Unit::Ratio),
            ("outlierWinRatio", "Outlier Win Ratio", Unit::Percent),
            ("outlierLossRatio", "Outlier Loss Ratio", Unit::Percent),
        ],
    ),
    (
        "Calendar",
        &[
            ("bestDay", "Best Day", Unit::Percent),
            ("worstDay", "Worst Day", Unit::Percent),
            ("bestMonth", "Best Month", Unit::Percent),
            ("worstMonth", "Worst Month", Unit::Percent),
            ("bestYear", "Best Year", Unit::Percent),
            ("worstYear", "Worst Year", Unit::Percent),
        ],
    ),
];

fn display(value: f64, unit: Unit) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    match unit {
        Unit::Percent => format!("{:.2}%", value * 100.0),
        Unit::Ratio => format!("{value:.3}"),
        Unit::Count => format!("{value:.0}"),
        Unit::Years => format!("{value:.2}"),
    }
}

/// Formatted value of `key`, or `n/a` if the report has no such metric.
fn cell(metrics: &[(&'static str, f64)], key: &str, unit: Unit) -> String {
    metrics
        .iter()
        .find(|(name, _)| *name == key)
        .map_or_else(|| "n/a".to_string(), |(_, v)| display(*v, unit))
}

/// Report plus the context needed to present it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    /// Dataset name, usually the input file name
    pub name: String,
    /// Kind the input was read as
    pub kind: SeriesKind,
    /// Number of rows skipped during normalization
    pub skipped_rows: usize,
    /// The metrics
    pub report: MetricsReport,
}

impl Summary {
    /// Build a summary from a finished analysis.
    pub fn new(name: impl Into<String>, analysis: &Analysis, skipped_rows: usize) -> Self {
        Self {
            name: name.into(),
            kind: analysis.kind,
            skipped_rows,
            report: analysis.report.clone(),
        }
    }

    fn period(&self) -> (NaiveDate, NaiveDate) {
        (self.report.start_date, self.report.end_date)
    }

    /// `(section, [(label, formatted value)])` in display order.
    pub fn rows(&self) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
        let metrics = self.report.metrics();

        SECTIONS
            .iter()
            .map(|(section, entries)| {
                let rows = entries
                    .iter()
                    .map(|(key, label, unit)| (*label, cell(&metrics, key, *unit)))
                    .collect();
                (*section, rows)
            })
            .collect()
    }

    /// Render as a fixed-width plain-text table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        let (start, end) = self.period();

        output.push_str(&format!("\nTearsheet: {} ({})\n", self.name, self.kind));
        output.push_str(&format!(
            "Period: {} to {} ({} days, {} years, {} returns)\n",
            start,
            end,
            self.report.total_days,
            display(self.report.years, Unit::Years),
            self.report.data_points
        ));
        if self.skipped_rows > 0 {
            output.push_str(&format!("Skipped rows: {}\n", self.skipped_rows));
        }
        output.push_str(&"=".repeat(60));
        output.push('\n');

        for (section, rows) in self.rows() {
            output.push_str(&format!("\n{section}:\n"));
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for (label, value) in rows {
                output.push_str(&format!("  {label:<32} {value:>16}\n"));
            }
        }
        output
    }

    /// Render as Markdown with one table per section.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        let (start, end) = self.period();

        output.push_str(&format!("# Tearsheet: {}\n\n", self.name));
        output.push_str(&format!("- **Series:** {}\n", self.kind));
        output.push_str(&format!("- **Period:** {start} to {end}\n"));
        output.push_str(&format!(
            "- **Span:** {} days ({} years)\n",
            self.report.total_days,
            display(self.report.years, Unit::Years)
        ));
        output.push_str(&format!("- **Returns:** {}\n", self.report.data_points));
        if self.skipped_rows > 0 {
            output.push_str(&format!("- **Skipped rows:** {}\n", self.skipped_rows));
        }

        for (section, rows) in self.rows() {
            output.push_str(&format!("\n## {section}\n\n"));
            output.push_str("| Metric | Value |\n");
            output.push_str("|--------|------:|\n");
            for (label, value) in rows {
                output.push_str(&format!("| {label} | {value} |\n"));
            }
        }
        output
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.period();
        let r = &self.report;
        writeln!(f, "Tearsheet: {} ({} to {})", self.name, start, end)?;
        writeln!(f, "  Cumulative Return: {}", display(r.cumulative_return, Unit::Percent))?;
        writeln!(f, "  CAGR: {}", display(r.cagr, Unit::Percent))?;
        writeln!(f, "  Volatility: {}", display(r.volatility, Unit::Percent))?;
        writeln!(f, "  Sharpe: {}", display(r.sharpe_ratio, Unit::Ratio))?;
        writeln!(f, "  Max Drawdown: {}", display(r.max_drawdown, Unit::Percent))?;
        Ok(())
    }
}

//! Raw table records as handed over by the file-ingestion layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single raw cell: spreadsheets yield numbers, CSV yields text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
}

impl Cell {
    /// Returns `true` for empty or whitespace-only text cells.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    /// Text view of the cell. Numbers are rendered with `Display`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One table row: column name to cell, in table column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: Vec<(String, Cell)>,
}

impl RawRecord {
    /// Build a record from `(column, cell)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use tearsheet_ingest::RawRecord;
    ///
    /// let row = RawRecord::from_pairs([("date", "2024-01-02".into()), ("nav", 1.05.into())]);
    /// assert_eq!(row.columns().collect::<Vec<_>>(), vec!["date", "nav"]);
    /// ```
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Cell)>,
    {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Look up a cell by exact column name.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    /// Column names in table order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// First cell of the row, if any.
    pub fn first(&self) -> Option<(&str, &Cell)> {
        self.fields.first().map(|(name, cell)| (name.as_str(), cell))
    }

    /// Number of cells in the row.
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no cells.
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

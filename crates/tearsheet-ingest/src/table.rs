//! Comma-separated text to [`RawRecord`]s.

use crate::error::Result;
use crate::record::{Cell, RawRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Read CSV text with a header row into records.
///
/// Columns with a blank header are dropped, fully blank lines are skipped and
/// rows may be shorter or longer than the header. All cells are text.
///
/// # Examples
///
/// ```
/// use tearsheet_ingest::table::read_csv;
///
/// let text = "date,nav\n2024-01-01,1.00\n2024-01-02,1.01\n";
/// let records = read_csv(text.as_bytes()).unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].get("nav").unwrap().as_text(), "1.01");
/// ```
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).trim().to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        let pairs = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, field)| (header.clone(), Cell::from(field)));
        records.push(RawRecord::from_pairs(pairs));
    }

    tracing::debug!(columns = headers.len(), rows = records.len(), "read csv table");
    Ok(records)
}

/// Read a CSV file from disk. See [`read_csv`].
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let file = File::open(path)?;
    read_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_and_blank_header() {
        let text = "\u{feff}date,,daily_return\n2024-01-02,x,0.5%\n\n2024-01-03,y,-0.2%\n";
        let records = read_csv(text.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        let columns: Vec<&str> = records[0].columns().collect();
        assert_eq!(columns, vec!["date", "daily_return"]);
        assert_eq!(records[1].get("daily_return"), Some(&Cell::from("-0.2%")));
    }

    #[test]
    fn test_short_rows_are_kept() {
        let text = "date,close,volume\n2024-01-02,10.5\n2024-01-03,10.7,1200\n";
        let records = read_csv(text.as_bytes()).unwrap();

        assert_eq!(records[0].len(), 2);
        assert_eq!(records[1].len(), 3);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_csv_path("/definitely/not/here.csv").is_err());
    }
}

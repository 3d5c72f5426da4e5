//! CSV closing price adapter.
//!
//! Accepts either one close per line with no header, or a headered export
//! with a `Close` column. When a headered file also has a `Date` column the
//! rows are ordered by date.

use crate::domain::error::TradeSimError;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PricePort for CsvPriceAdapter {
    fn load_prices(&self) -> Result<PriceSeries, TradeSimError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TradeSimError::DataFile {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let prices = parse_prices(&content)?;
        tracing::debug!(path = %self.path.display(), days = prices.len(), "loaded prices");
        Ok(prices)
    }
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    close: usize,
    date: Option<usize>,
}

impl Layout {
    const HEADERLESS: Layout = Layout {
        close: 0,
        date: None,
    };

    fn from_header(record: &csv::StringRecord, line: u64) -> Result<Self, TradeSimError> {
        let find = |name: &str| record.iter().position(|h| h.eq_ignore_ascii_case(name));
        let close = find("close").ok_or_else(|| TradeSimError::CorruptData {
            line,
            value: record.iter().collect::<Vec<_>>().join(","),
        })?;
        Ok(Self {
            close,
            date: find("date"),
        })
    }
}

/// Parses CSV text into a price series.
pub fn parse_prices(content: &str) -> Result<PriceSeries, TradeSimError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut layout: Option<Layout> = None;
    let mut rows: Vec<(Option<NaiveDate>, f64)> = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let fallback_line = i as u64 + 1;
        let record = result.map_err(|e| TradeSimError::CorruptData {
            line: e.position().map(|p| p.line()).unwrap_or(fallback_line),
            value: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        if record.iter().all(str::is_empty) {
            continue;
        }

        let cols = match layout {
            Some(l) => l,
            None => {
                let first = record.get(0).unwrap_or_default();
                if first.parse::<f64>().is_err() {
                    layout = Some(Layout::from_header(&record, line)?);
                    continue;
                }
                *layout.insert(Layout::HEADERLESS)
            }
        };

        let raw = record.get(cols.close).unwrap_or_default();
        let close = raw
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| TradeSimError::CorruptData {
                line,
                value: raw.to_string(),
            })?;

        let date = match cols.date {
            Some(idx) => Some(parse_date(record.get(idx).unwrap_or_default(), line)?),
            None => None,
        };

        rows.push((date, close));
    }

    rows.sort_by_key(|(date, _)| *date);
    PriceSeries::new(rows.into_iter().map(|(_, close)| close).collect())
}

/// Reads the `YYYY-MM-DD` prefix, so timestamped exports also parse.
fn parse_date(raw: &str, line: u64) -> Result<NaiveDate, TradeSimError> {
    let prefix = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_err(|_| TradeSimError::CorruptData {
        line,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_headerless_closes() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "temp.csv", "101.5\n102.25\n99.0\n");
        let prices = CsvPriceAdapter::new(path).load_prices().unwrap();
        assert_eq!(prices.as_slice(), &[101.5, 102.25, 99.0]);
    }

    #[test]
    fn missing_file_is_data_file_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvPriceAdapter::new(dir.path().join("invalid_name.csv"));
        assert!(matches!(
            adapter.load_prices(),
            Err(TradeSimError::DataFile { .. })
        ));
    }

    #[test]
    fn corrupt_value_reports_line() {
        let err = parse_prices("1.0\n2.0\nabc\n").unwrap_err();
        assert!(matches!(err, TradeSimError::CorruptData { line: 3, value } if value == "abc"));
    }

    #[test]
    fn nan_is_rejected() {
        let err = parse_prices("1.0\nNaN\n").unwrap_err();
        assert!(matches!(err, TradeSimError::CorruptData { line: 2, .. }));
    }

    #[test]
    fn empty_file_is_empty_series() {
        assert!(matches!(parse_prices(""), Err(TradeSimError::EmptySeries)));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let prices = parse_prices("1.0\n\n2.0\n\n").unwrap();
        assert_eq!(prices.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn headered_export_uses_close_column() {
        let content = "Date,Open,High,Low,Close,Volume\n\
            2024-01-02 00:00:00-05:00,10.0,11.0,9.0,10.5,1000\n\
            2024-01-03 00:00:00-05:00,10.5,12.0,10.0,11.5,1200\n";
        let prices = parse_prices(content).unwrap();
        assert_eq!(prices.as_slice(), &[10.5, 11.5]);
    }

    #[test]
    fn headered_export_is_sorted_by_date() {
        let content = "date,close\n2024-01-05,3.0\n2024-01-03,1.0\n2024-01-04,2.0\n";
        let prices = parse_prices(content).unwrap();
        assert_eq!(prices.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn header_without_close_column_is_rejected() {
        let err = parse_prices("Date,Open\n2024-01-02,1.0\n").unwrap_err();
        assert!(matches!(err, TradeSimError::CorruptData { line: 1, .. }));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let err = parse_prices("Date,Close\n01/02/2024,1.0\n").unwrap_err();
        assert!(matches!(err, TradeSimError::CorruptData { line: 2, .. }));
    }
}

//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row.
//! Columns are located by name so exports with extra columns (`Adj Close`)
//! or a different column order load unchanged.

use crate::domain::error::DcatraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_HEADERS: [&str; 3] = ["date", "datetime", "timestamp"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

/// Column positions resolved from the header row.
struct Columns {
    timestamp: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DcatraderError> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |wanted: &[&str]| {
            names
                .iter()
                .position(|n| wanted.contains(&n.as_str()))
                .ok_or_else(|| DcatraderError::Data {
                    reason: format!("missing {} column", wanted[0]),
                })
        };

        Ok(Columns {
            timestamp: find(&TIMESTAMP_HEADERS)?,
            open: find(&["open"])?,
            high: find(&["high"])?,
            low: find(&["low"])?,
            close: find(&["close"])?,
            volume: find(&["volume"])?,
        })
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DcatraderError> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DcatraderError::Data {
            reason: format!("invalid timestamp: {}", raw),
        })
}

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, DcatraderError> {
    record
        .get(idx)
        .ok_or_else(|| DcatraderError::Data {
            reason: format!("missing {} value", name),
        })?
        .trim()
        .parse()
        .map_err(|e| DcatraderError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Every bar in the symbol's file, sorted by timestamp.
    fn read_all(&self, symbol: &str) -> Result<Vec<OhlcvBar>, DcatraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| DcatraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DcatraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::from_headers(headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DcatraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let raw_ts = record.get(cols.timestamp).unwrap_or_default();
            bars.push(OhlcvBar {
                timestamp: parse_timestamp(raw_ts)?,
                open: parse_field(&record, cols.open, "open")?,
                high: parse_field(&record, cols.high, "high")?,
                low: parse_field(&record, cols.low, "low")?,
                close: parse_field(&record, cols.close, "close")?,
                volume: parse_field(&record, cols.volume, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        debug!("read {} bars from {}", bars.len(), path.display());
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, DcatraderError> {
        let bars = self
            .read_all(symbol)?
            .into_iter()
            .filter(|b| {
                let date = b.timestamp.date();
                start_date.is_none_or(|s| date >= s) && end_date.is_none_or(|e| date <= e)
            })
            .collect();
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, DcatraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DcatraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DcatraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, DcatraderError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let bars = self.read_all(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp, bars.len())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000.5\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("BTC-USD.csv"), csv_content).unwrap();
        fs::write(path.join("ETH-USD.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "not data").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_ohlcv_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_ohlcv("BTC-USD", None, None).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp.date(), date(15));
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000.5);
        assert_eq!(bars[2].timestamp.date(), date(17));
    }

    #[test]
    fn fetch_ohlcv_filters_inclusive_range() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter
            .fetch_ohlcv("BTC-USD", Some(date(16)), Some(date(16)))
            .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 110.0);

        let bars = adapter.fetch_ohlcv("BTC-USD", Some(date(16)), None).unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn fetch_ohlcv_missing_file_is_data_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_ohlcv("XYZ", None, None).unwrap_err();
        assert!(matches!(err, DcatraderError::Data { .. }));
    }

    #[test]
    fn headers_resolved_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("SOL.csv"),
            "Timestamp,Close,Adj Close,Volume,Open,High,Low\n\
             2024-03-01 12:30:00,20.5,20.4,7,19.0,21.0,18.5\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let bars = adapter.fetch_ohlcv("SOL", None, None).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 20.5);
        assert_eq!(bars[0].open, 19.0);
        assert_eq!(bars[0].low, 18.5);
        assert_eq!(bars[0].volume, 7.0);
        assert_eq!(bars[0].timestamp.to_string(), "2024-03-01 12:30:00");
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("X.csv"), "date,open,high,low,volume\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.fetch_ohlcv("X", None, None).unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn bad_number_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("X.csv"),
            "date,open,high,low,close,volume\n2024-01-01,1,2,0.5,abc,10\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.fetch_ohlcv("X", None, None).unwrap_err();
        assert!(err.to_string().contains("invalid close value"));
    }

    #[test]
    fn parse_timestamp_accepts_supported_formats() {
        assert_eq!(
            parse_timestamp("2024-01-02").unwrap().to_string(),
            "2024-01-02 00:00:00"
        );
        assert_eq!(
            parse_timestamp("2024-01-02 03:04:05").unwrap().to_string(),
            "2024-01-02 03:04:05"
        );
        assert_eq!(
            parse_timestamp("2024-01-02T03:04:05").unwrap().to_string(),
            "2024-01-02 03:04:05"
        );
        assert!(parse_timestamp("02/01/2024").is_err());
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["BTC-USD", "ETH-USD"]);
    }

    #[test]
    fn get_data_range_reports_bounds_and_count() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let (first, last, count) = adapter.get_data_range("BTC-USD").unwrap().unwrap();
        assert_eq!(first.date(), date(15));
        assert_eq!(last.date(), date(17));
        assert_eq!(count, 3);

        assert_eq!(adapter.get_data_range("ETH-USD").unwrap(), None);
        assert_eq!(adapter.get_data_range("XYZ").unwrap(), None);
    }
}

//! Candle loading from CSV files.
//!
//! Expected header: `timestamp,open,high,low,close,volume`, with timestamps
//! in milliseconds since the Unix epoch. The symbol and timeframe are not
//! columns; a series file describes one instrument, so the caller supplies
//! both.
//!
//! Strictly increasing timestamps are enforced here, at the boundary, so the
//! engine can assume them. OHLC quality problems (high below the body, NaN
//! fields) are reported as warnings on the loaded series, not errors: the
//! simulator tolerates them, the analyst should know about them.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use stratsim_core::domain::{Candle, Timeframe};

use crate::fingerprint;

/// Errors from the candle loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read candle file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse candle file: {0}")]
    Csv(#[from] csv::Error),

    #[error("candle file contains no rows")]
    Empty,

    #[error("timestamps must strictly increase: row {row} has {timestamp} after {previous}")]
    OutOfOrder {
        row: usize,
        timestamp: i64,
        previous: i64,
    },
}

/// One CSV row. Symbol and timeframe come from the caller.
#[derive(Debug, Deserialize)]
struct CandleRow {
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// A loaded candle series with data-quality notes and its content hash.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub candles: Vec<Candle>,
    /// Non-fatal data-quality findings, one line per affected row.
    pub warnings: Vec<String>,
    /// BLAKE3 hash over the series, for run manifests.
    pub dataset_hash: String,
}

/// Loads a candle series from a CSV file.
pub fn load_candles(
    path: &Path,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<LoadedSeries, LoadError> {
    let file = std::fs::File::open(path)?;
    parse_candles(file, symbol, timeframe)
}

/// Parses a candle series from any reader. Separated from [`load_candles`]
/// so tests can feed in-memory CSV.
pub fn parse_candles<R: Read>(
    reader: R,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<LoadedSeries, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut candles: Vec<Candle> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for (index, row) in csv_reader.deserialize::<CandleRow>().enumerate() {
        let row = row?;
        // Header is row 0 in the file; data rows are 1-based for humans.
        let file_row = index + 1;

        if let Some(previous) = candles.last() {
            if row.timestamp <= previous.timestamp {
                return Err(LoadError::OutOfOrder {
                    row: file_row,
                    timestamp: row.timestamp,
                    previous: previous.timestamp,
                });
            }
        }

        let candle = Candle {
            symbol: symbol.to_string(),
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            timeframe,
        };
        if candle.is_void() {
            warnings.push(format!("row {file_row}: candle contains NaN values"));
        } else if !candle.is_sane() {
            warnings.push(format!(
                "row {file_row}: high/low do not bracket open/close \
                 (o={} h={} l={} c={})",
                candle.open, candle.high, candle.low, candle.close
            ));
        }
        candles.push(candle);
    }

    if candles.is_empty() {
        return Err(LoadError::Empty);
    }

    let dataset_hash = fingerprint::dataset_hash(&candles);
    Ok(LoadedSeries {
        candles,
        warnings,
        dataset_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_CSV: &str = "\
timestamp,open,high,low,close,volume
1700000000000,100.0,101.0,99.0,100.5,1200
1700003600000,100.5,102.0,100.0,101.5,1500
1700007200000,101.5,101.8,100.2,100.4,900
";

    #[test]
    fn parses_well_formed_csv() {
        let series = parse_candles(GOOD_CSV.as_bytes(), "BTC-USD", Timeframe::H1).unwrap();

        assert_eq!(series.candles.len(), 3);
        assert!(series.warnings.is_empty());
        let first = &series.candles[0];
        assert_eq!(first.symbol, "BTC-USD");
        assert_eq!(first.timestamp, 1_700_000_000_000);
        assert_eq!(first.close, 100.5);
        assert_eq!(first.timeframe, Timeframe::H1);
        assert_eq!(series.dataset_hash.len(), 64);
    }

    #[test]
    fn rejects_out_of_order_timestamps() {
        let csv = "\
timestamp,open,high,low,close,volume
1700003600000,100.0,101.0,99.0,100.5,1200
1700000000000,100.5,102.0,100.0,101.5,1500
";
        let err = parse_candles(csv.as_bytes(), "BTC-USD", Timeframe::H1).unwrap_err();
        match err {
            LoadError::OutOfOrder {
                row,
                timestamp,
                previous,
            } => {
                assert_eq!(row, 2);
                assert_eq!(timestamp, 1_700_000_000_000);
                assert_eq!(previous, 1_700_003_600_000);
            }
            other => panic!("expected OutOfOrder, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let csv = "\
timestamp,open,high,low,close,volume
1700000000000,100.0,101.0,99.0,100.5,1200
1700000000000,100.5,102.0,100.0,101.5,1500
";
        let err = parse_candles(csv.as_bytes(), "BTC-USD", Timeframe::H1).unwrap_err();
        assert!(matches!(err, LoadError::OutOfOrder { row: 2, .. }));
    }

    #[test]
    fn rejects_empty_file() {
        let csv = "timestamp,open,high,low,close,volume\n";
        let err = parse_candles(csv.as_bytes(), "BTC-USD", Timeframe::H1).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn malformed_row_is_a_csv_error() {
        let csv = "\
timestamp,open,high,low,close,volume
1700000000000,100.0,not_a_number,99.0,100.5,1200
";
        let err = parse_candles(csv.as_bytes(), "BTC-USD", Timeframe::H1).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn insane_candle_warns_but_loads() {
        // High below the close.
        let csv = "\
timestamp,open,high,low,close,volume
1700000000000,100.0,100.2,99.0,100.5,1200
";
        let series = parse_candles(csv.as_bytes(), "BTC-USD", Timeframe::H1).unwrap();
        assert_eq!(series.candles.len(), 1);
        assert_eq!(series.warnings.len(), 1);
        assert!(series.warnings[0].contains("row 1"));
    }

    #[test]
    fn nan_candle_warns_but_loads() {
        let csv = "\
timestamp,open,high,low,close,volume
1700000000000,NaN,101.0,99.0,100.5,1200
";
        let series = parse_candles(csv.as_bytes(), "BTC-USD", Timeframe::H1).unwrap();
        assert_eq!(series.candles.len(), 1);
        assert_eq!(series.warnings.len(), 1);
        assert!(series.warnings[0].contains("NaN"));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candles.csv");
        std::fs::write(&path, GOOD_CSV).unwrap();

        let series = load_candles(&path, "ETH-USD", Timeframe::M15).unwrap();
        assert_eq!(series.candles.len(), 3);
        assert_eq!(series.candles[0].timeframe, Timeframe::M15);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_candles(Path::new("/nonexistent/candles.csv"), "X", Timeframe::H1)
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn identical_content_hashes_identically() {
        let a = parse_candles(GOOD_CSV.as_bytes(), "BTC-USD", Timeframe::H1).unwrap();
        let b = parse_candles(GOOD_CSV.as_bytes(), "BTC-USD", Timeframe::H1).unwrap();
        let other_symbol = parse_candles(GOOD_CSV.as_bytes(), "ETH-USD", Timeframe::H1).unwrap();

        assert_eq!(a.dataset_hash, b.dataset_hash);
        assert_ne!(a.dataset_hash, other_symbol.dataset_hash);
    }
}

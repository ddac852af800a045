//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with the header
//! `date,open,high,low,close,volume` and ISO dates. Rows may be in any order.

use crate::domain::error::TradekitError;
use crate::domain::ohlcv::{BarHistory, OhlcvBar};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Every bar in the symbol's file, sorted by date.
    pub fn read_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, TradekitError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TradekitError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TradekitError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = column(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TradekitError::Data {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            bars.push(OhlcvBar {
                date,
                open: parse_column(&record, 1, "open")?,
                high: parse_column(&record, 2, "high")?,
                low: parse_column(&record, 3, "low")?,
                close: parse_column(&record, 4, "close")?,
                volume: parse_column(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn column<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, TradekitError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| TradekitError::Data {
            reason: format!("missing {} column", name),
        })
}

fn parse_column<T>(record: &csv::StringRecord, index: usize, name: &str) -> Result<T, TradekitError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = column(record, index, name)?;
    raw.parse().map_err(|e| TradekitError::Data {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str, lookback: usize) -> Result<BarHistory, TradekitError> {
        let bars = self.read_bars(symbol)?;
        if bars.len() < lookback {
            return Err(TradekitError::InsufficientData {
                symbol: symbol.to_string(),
                bars: bars.len(),
                minimum: lookback,
            });
        }
        Ok(BarHistory::from_bars(&bars[bars.len() - lookback..]))
    }

    fn list_symbols(&self) -> Result<Vec<String>, TradekitError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TradekitError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TradekitError::Data {
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
}

//! OHLCV bar representation.
//!
//! [`OhlcvBar`] is a single dated row as delivered by a data source;
//! [`BarHistory`] is the column-oriented form the indicators consume.

use crate::domain::error::IndicatorError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// One column of a [`BarHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
    Volume,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriceField::Open => "OPEN",
            PriceField::High => "HIGH",
            PriceField::Low => "LOW",
            PriceField::Close => "CLOSE",
            PriceField::Volume => "VOLUME",
        };
        f.write_str(name)
    }
}

impl FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(PriceField::Open),
            "HIGH" => Ok(PriceField::High),
            "LOW" => Ok(PriceField::Low),
            "CLOSE" => Ok(PriceField::Close),
            "VOLUME" => Ok(PriceField::Volume),
            other => Err(format!("unknown price field '{}'", other)),
        }
    }
}

/// Five aligned sequences, oldest bar first.
///
/// All columns always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarHistory {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<i64>,
}

impl BarHistory {
    pub fn new(
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<i64>,
    ) -> Result<Self, IndicatorError> {
        let len = close.len();
        let lengths = [
            ("open", open.len()),
            ("high", high.len()),
            ("low", low.len()),
            ("volume", volume.len()),
        ];
        for (name, column_len) in lengths {
            if column_len != len {
                return Err(IndicatorError::MismatchedLengths {
                    reason: format!("{} has {} values, close has {}", name, column_len, len),
                });
            }
        }
        Ok(Self {
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn from_bars(bars: &[OhlcvBar]) -> Self {
        Self {
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
            volume: bars.iter().map(|b| b.volume).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[i64] {
        &self.volume
    }

    /// Copy one column out as floating point values.
    pub fn column(&self, field: PriceField) -> Vec<f64> {
        match field {
            PriceField::Open => self.open.clone(),
            PriceField::High => self.high.clone(),
            PriceField::Low => self.low.clone(),
            PriceField::Close => self.close.clone(),
            PriceField::Volume => self.volume.iter().map(|&v| v as f64).collect(),
        }
    }
}

//! Technical indicator implementations.
//!
//! Every indicator produces an output sequence aligned index-for-index with
//! its input. Positions before the first computable index are `0.0`, not
//! `NaN`; consumers index into the raw output and rely on that.
//!
//! Indicators that need a minimum amount of history (ATR, RSI, ADX) return
//! an empty output when there is not enough of it. Invalid parameters are
//! reported as [`IndicatorError`].
//!
//! The [`Indicator`] trait is the seam used by filters and rankings. Its
//! implementors come in two families:
//! - time-series indicators, carrying a [`TimeSeriesInput`]
//! - bar-history indicators, carrying a [`BarHistoryInput`]

pub mod adx;
pub mod bollinger;
pub mod moving_average;
pub mod price;
pub mod roc;
pub mod rsi;
pub mod rsl;
pub mod stats;
pub mod true_range;

#[cfg(test)]
pub(crate) mod test_data;

pub use adx::AverageDirectionalIndex;
pub use bollinger::{BandField, Bollinger, BollingerBands};
pub use moving_average::{MaKind, MovingAverage};
pub use price::Price;
pub use roc::RateOfChange;
pub use rsi::RelativeStrengthIndex;
pub use rsl::RelativeStrengthLevy;
pub use true_range::{AverageTrueRange, AverageTrueRangePercent, TrueRange};

use crate::domain::error::IndicatorError;
use crate::domain::ohlcv::{BarHistory, PriceField};
use std::fmt;

/// A computation over either a numeric sequence or a bar history.
///
/// `bind` replaces the input; `compute` is pure and may be called any number
/// of times.
pub trait Indicator: fmt::Display + fmt::Debug + Send + Sync {
    /// Lookback window in bars (0 for unwindowed indicators).
    fn period(&self) -> usize;

    fn bind(&mut self, bars: &BarHistory);

    fn compute(&self) -> Result<Vec<f64>, IndicatorError>;

    fn box_clone(&self) -> Box<dyn Indicator>;

    /// Compute against `bars` without touching `self`'s own input.
    fn compute_on(&self, bars: &BarHistory) -> Result<Vec<f64>, IndicatorError> {
        let mut bound = self.box_clone();
        bound.bind(bars);
        bound.compute()
    }
}

impl Clone for Box<dyn Indicator> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Input of a time-series indicator.
///
/// Binding to a bar history copies the `source` column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesInput {
    pub values: Vec<f64>,
    pub period: usize,
    pub source: PriceField,
}

impl TimeSeriesInput {
    pub fn new(values: Vec<f64>, period: usize) -> Self {
        Self {
            values,
            period,
            source: PriceField::Close,
        }
    }

    /// An unbound input reading `source` once bound.
    pub fn from_source(source: PriceField, period: usize) -> Self {
        Self {
            values: Vec::new(),
            period,
            source,
        }
    }

    pub fn bind(&mut self, bars: &BarHistory) {
        self.values = bars.column(self.source);
    }

    /// `SMA(20)` for close, `SMA(20,HIGH)` otherwise.
    fn fmt_args(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source == PriceField::Close {
            write!(f, "{}", self.period)
        } else {
            write!(f, "{},{}", self.period, self.source)
        }
    }
}

/// Input of a bar-history indicator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarHistoryInput {
    pub bars: BarHistory,
    pub period: usize,
}

impl BarHistoryInput {
    pub fn new(bars: BarHistory, period: usize) -> Self {
        Self { bars, period }
    }

    pub fn unbound(period: usize) -> Self {
        Self {
            bars: BarHistory::default(),
            period,
        }
    }

    pub fn bind(&mut self, bars: &BarHistory) {
        self.bars = bars.clone();
    }
}

/// Shared precondition of the windowed indicators.
///
/// `period == input.len()` is valid and leaves exactly one computable
/// position, the last one.
pub fn check_input(input: &[f64], period: usize) -> Result<(), IndicatorError> {
    if input.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }
    if period == 0 {
        return Err(IndicatorError::ZeroPeriod);
    }
    if period > input.len() {
        return Err(IndicatorError::PeriodTooLarge {
            period,
            len: input.len(),
        });
    }
    Ok(())
}

/// Convert a signed period (as read from text) into a window length.
pub fn validate_period(period: i64) -> Result<usize, IndicatorError> {
    match period {
        p if p < 0 => Err(IndicatorError::NegativePeriod(p)),
        0 => Err(IndicatorError::ZeroPeriod),
        p => Ok(p as usize),
    }
}

//! True Range, Average True Range and ATR percent.
//!
//! TR[0] = high[0] - low[0]
//! TR[i] = max(high[i] - low[i], |high[i] - close[i-1]|, |low[i] - close[i-1]|)
//! ATR(n) = Wilder moving average of TR
//! ATRP(n)[i] = ATR(n)[i] / close[i] * 100

use crate::domain::error::IndicatorError;
use crate::domain::indicator::moving_average::{moving_average, MaKind};
use crate::domain::indicator::{BarHistoryInput, Indicator};
use crate::domain::ohlcv::BarHistory;
use std::fmt;

pub fn true_range(bars: &BarHistory) -> Vec<f64> {
    let (high, low, close) = (bars.high(), bars.low(), bars.close());
    let mut values = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let hl = high[i] - low[i];
        let tr = if i == 0 {
            hl
        } else {
            let hc = (high[i] - close[i - 1]).abs();
            let lc = (low[i] - close[i - 1]).abs();
            hl.max(hc).max(lc)
        };
        values.push(tr);
    }
    values
}

/// Empty output when there are fewer than `period` bars.
pub fn average_true_range(bars: &BarHistory, period: usize) -> Result<Vec<f64>, IndicatorError> {
    if bars.len() < period {
        return Ok(Vec::new());
    }
    moving_average(&true_range(bars), period, MaKind::Wilder)
}

/// A zero close yields 0.0 rather than a division by zero.
pub fn average_true_range_percent(
    bars: &BarHistory,
    period: usize,
) -> Result<Vec<f64>, IndicatorError> {
    let atr = average_true_range(bars, period)?;
    let values = atr
        .iter()
        .zip(bars.close())
        .map(|(&a, &c)| if c == 0.0 { 0.0 } else { a / c * 100.0 })
        .collect();
    Ok(values)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrueRange {
    pub input: BarHistoryInput,
}

impl TrueRange {
    pub fn new(bars: BarHistory) -> Self {
        Self {
            input: BarHistoryInput::new(bars, 0),
        }
    }
}

impl fmt::Display for TrueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TR")
    }
}

impl Indicator for TrueRange {
    fn period(&self) -> usize {
        0
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        Ok(true_range(&self.input.bars))
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageTrueRange {
    pub input: BarHistoryInput,
}

impl AverageTrueRange {
    pub fn new(bars: BarHistory, period: usize) -> Self {
        Self {
            input: BarHistoryInput::new(bars, period),
        }
    }

    pub fn unbound(period: usize) -> Self {
        Self {
            input: BarHistoryInput::unbound(period),
        }
    }
}

impl fmt::Display for AverageTrueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ATR({})", self.input.period)
    }
}

impl Indicator for AverageTrueRange {
    fn period(&self) -> usize {
        self.input.period
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        average_true_range(&self.input.bars, self.input.period)
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageTrueRangePercent {
    pub input: BarHistoryInput,
}

impl AverageTrueRangePercent {
    pub fn new(bars: BarHistory, period: usize) -> Self {
        Self {
            input: BarHistoryInput::new(bars, period),
        }
    }

    pub fn unbound(period: usize) -> Self {
        Self {
            input: BarHistoryInput::unbound(period),
        }
    }
}

impl fmt::Display for AverageTrueRangePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ATRP({})", self.input.period)
    }
}

impl Indicator for AverageTrueRangePercent {
    fn period(&self) -> usize {
        self.input.period
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        average_true_range_percent(&self.input.bars, self.input.period)
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

//! Directional movement: DI+/DI−, DX and ADX (Wilder).
//!
//! 1. up = H[i] - H[i-1], down = L[i-1] - L[i]
//!    +DM = up if up > down && up > 0, −DM = down if down > up && down > 0, else 0
//! 2. TR per `true_range`
//! 3. Wilder running sums of +DM, −DM and TR: seeded with the sum of the first n
//!    raw values (placed at n-1), then acc = acc - acc/n + x[i]
//! 4. ±DI = round(100 * smoothed(±DM) / smoothed(TR))
//! 5. DX = 100 * |+DI - −DI| / (+DI + −DI)
//! 6. ADX seeded at 2n-1 with mean(DX[n..2n]), then ADX[i] = (ADX[i-1]*(n-1) + DX[i]) / n
//!
//! A zero smoothed TR gives DI = 0 and a zero DI sum gives DX = 0, so flat
//! markets read as "no trend" rather than NaN.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::stats::mean;
use crate::domain::indicator::true_range::true_range;
use crate::domain::indicator::{BarHistoryInput, Indicator};
use crate::domain::ohlcv::BarHistory;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionalIndicators {
    pub plus: Vec<f64>,
    pub minus: Vec<f64>,
}

impl DirectionalIndicators {
    pub fn is_empty(&self) -> bool {
        self.plus.is_empty()
    }
}

fn directional_movement(bars: &BarHistory) -> (Vec<f64>, Vec<f64>) {
    let (high, low) = (bars.high(), bars.low());
    let mut plus = vec![0.0; bars.len()];
    let mut minus = vec![0.0; bars.len()];

    for i in 1..bars.len() {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];

        if up > down && up > 0.0 {
            plus[i] = up;
        } else if down > up && down > 0.0 {
            minus[i] = down;
        }
    }
    (plus, minus)
}

fn wilder_sum(values: &[f64], period: usize) -> Vec<f64> {
    let mut sums = vec![0.0; values.len()];
    let n = period as f64;
    let mut acc: f64 = values[..period].iter().sum();
    sums[period - 1] = acc;

    for i in period..values.len() {
        acc = acc - acc / n + values[i];
        sums[i] = acc;
    }
    sums
}

/// Empty output when there are fewer than `period` bars.
pub fn directional_indicators(
    bars: &BarHistory,
    period: usize,
) -> Result<DirectionalIndicators, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::ZeroPeriod);
    }
    if bars.len() < period {
        return Ok(DirectionalIndicators::default());
    }

    let (plus_dm, minus_dm) = directional_movement(bars);
    let smoothed_plus = wilder_sum(&plus_dm, period);
    let smoothed_minus = wilder_sum(&minus_dm, period);
    let smoothed_tr = wilder_sum(&true_range(bars), period);

    let mut plus = vec![0.0; bars.len()];
    let mut minus = vec![0.0; bars.len()];
    for i in (period - 1)..bars.len() {
        if smoothed_tr[i] != 0.0 {
            plus[i] = (100.0 * smoothed_plus[i] / smoothed_tr[i]).round();
            minus[i] = (100.0 * smoothed_minus[i] / smoothed_tr[i]).round();
        }
    }

    Ok(DirectionalIndicators { plus, minus })
}

pub fn directional_movement_index(
    bars: &BarHistory,
    period: usize,
) -> Result<Vec<f64>, IndicatorError> {
    let di = directional_indicators(bars, period)?;
    if di.is_empty() {
        return Ok(Vec::new());
    }

    let mut dx = vec![0.0; bars.len()];
    for i in (period - 1)..bars.len() {
        let sum = di.plus[i] + di.minus[i];
        if sum != 0.0 {
            dx[i] = 100.0 * (di.plus[i] - di.minus[i]).abs() / sum;
        }
    }
    Ok(dx)
}

/// Empty output when there are fewer than `period` bars; all zeros while
/// fewer than `2 * period` bars exist.
pub fn average_directional_index(
    bars: &BarHistory,
    period: usize,
) -> Result<Vec<f64>, IndicatorError> {
    let dx = directional_movement_index(bars, period)?;
    if dx.is_empty() {
        return Ok(Vec::new());
    }

    let mut adx = vec![0.0; dx.len()];
    let seed_at = 2 * period - 1;
    if dx.len() > seed_at {
        let n = period as f64;
        adx[seed_at] = mean(&dx[period..2 * period])?;
        for i in (seed_at + 1)..dx.len() {
            adx[i] = (adx[i - 1] * (n - 1.0) + dx[i]) / n;
        }
    }
    Ok(adx)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageDirectionalIndex {
    pub input: BarHistoryInput,
}

impl AverageDirectionalIndex {
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

impl fmt::Display for AverageDirectionalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ADX({})", self.input.period)
    }
}

impl Indicator for AverageDirectionalIndex {
    fn period(&self) -> usize {
        self.input.period
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        average_directional_index(&self.input.bars, self.input.period)
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

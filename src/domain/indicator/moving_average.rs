//! Moving average engine.
//!
//! - SMA: unweighted mean of the trailing `n` values
//! - LWMA: trailing window, weight for lag j is (n-j) / (n*(n+1)/2)
//! - EMA: seeded with the SMA at index n-1, then EMA[i] = EMA[i-1] + α(x[i] - EMA[i-1]),
//!   α = 2/(n+1)
//! - WILDER: seeded with the mean of the first n values, then
//!   W[i] = W[i-1] + (x[i] - W[i-1]) / n
//!
//! Warmup: first (n-1) positions are 0.0.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{check_input, Indicator, TimeSeriesInput};
use crate::domain::ohlcv::{BarHistory, PriceField};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaKind {
    #[default]
    Sma,
    Ema,
    Lwma,
    Wilder,
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaKind::Sma => "SMA",
            MaKind::Ema => "EMA",
            MaKind::Lwma => "LWMA",
            MaKind::Wilder => "WILDER",
        };
        f.write_str(name)
    }
}

impl FromStr for MaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SMA" => Ok(MaKind::Sma),
            "EMA" => Ok(MaKind::Ema),
            "LWMA" => Ok(MaKind::Lwma),
            "WILDER" => Ok(MaKind::Wilder),
            other => Err(format!("unknown moving average type '{}'", other)),
        }
    }
}

pub fn moving_average(
    input: &[f64],
    period: usize,
    kind: MaKind,
) -> Result<Vec<f64>, IndicatorError> {
    check_input(input, period)?;

    let values = match kind {
        MaKind::Sma => sma(input, period),
        MaKind::Lwma => lwma(input, period),
        MaKind::Ema => ema(input, period),
        MaKind::Wilder => wilder(input, period),
    };
    Ok(values)
}

/// LWMA weights ordered by lag, most recent value first.
pub fn lwma_weights(period: usize) -> Vec<f64> {
    let divisor = (period * (period + 1)) as f64 / 2.0;
    (0..period)
        .map(|lag| (period - lag) as f64 / divisor)
        .collect()
}

fn sma(input: &[f64], period: usize) -> Vec<f64> {
    let mut values = vec![0.0; input.len()];
    for i in (period - 1)..input.len() {
        let window = &input[i + 1 - period..=i];
        values[i] = window.iter().sum::<f64>() / period as f64;
    }
    values
}

// O(n) sliding window: adding a value raises every older weight by one, so
// the new weighted sum is the old one plus n*x[i] minus the previous window sum.
fn lwma(input: &[f64], period: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(input.len());
    let divisor = (period * (period + 1)) as f64 / 2.0;
    let mut weighted_sum: f64 = 0.0;
    let mut window_sum: f64 = 0.0;

    for (i, &x) in input.iter().enumerate() {
        if i < period {
            weighted_sum += (i + 1) as f64 * x;
            window_sum += x;
        } else {
            weighted_sum += period as f64 * x - window_sum;
            window_sum += x - input[i - period];
        }

        let valid = i >= period - 1;
        values.push(if valid { weighted_sum / divisor } else { 0.0 });
    }
    values
}

fn ema(input: &[f64], period: usize) -> Vec<f64> {
    let mut values = vec![0.0; input.len()];
    let alpha = 2.0 / (period as f64 + 1.0);

    values[period - 1] = input[..period].iter().sum::<f64>() / period as f64;
    for i in period..input.len() {
        values[i] = values[i - 1] + alpha * (input[i] - values[i - 1]);
    }
    values
}

fn wilder(input: &[f64], period: usize) -> Vec<f64> {
    let mut values = vec![0.0; input.len()];

    values[period - 1] = input[..period].iter().sum::<f64>() / period as f64;
    for i in period..input.len() {
        values[i] = values[i - 1] + (input[i] - values[i - 1]) / period as f64;
    }
    values
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    pub input: TimeSeriesInput,
    pub kind: MaKind,
}

impl MovingAverage {
    pub fn new(values: Vec<f64>, period: usize, kind: MaKind) -> Self {
        Self {
            input: TimeSeriesInput::new(values, period),
            kind,
        }
    }

    pub fn from_source(source: PriceField, period: usize, kind: MaKind) -> Self {
        Self {
            input: TimeSeriesInput::from_source(source, period),
            kind,
        }
    }
}

impl fmt::Display for MovingAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        self.input.fmt_args(f)?;
        write!(f, ")")
    }
}

impl Indicator for MovingAverage {
    fn period(&self) -> usize {
        self.input.period
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        moving_average(&self.input.values, self.input.period, self.kind)
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

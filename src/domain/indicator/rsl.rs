//! RSL (Relative Strength after Levy).
//!
//! RSL(n)[i] = C[i] / mean(C[i-n..=i])
//! The mean covers the current value and the n values before it.
//! Warmup: first n positions are 0.0.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::stats::mean;
use crate::domain::indicator::{check_input, Indicator, TimeSeriesInput};
use crate::domain::ohlcv::{BarHistory, PriceField};
use std::fmt;

pub fn relative_strength_levy(input: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    check_input(input, period)?;

    let mut values = vec![0.0; input.len()];
    for i in period..input.len() {
        values[i] = input[i] / mean(&input[i - period..=i])?;
    }
    Ok(values)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelativeStrengthLevy {
    pub input: TimeSeriesInput,
}

impl RelativeStrengthLevy {
    pub fn new(values: Vec<f64>, period: usize) -> Self {
        Self {
            input: TimeSeriesInput::new(values, period),
        }
    }

    pub fn from_source(source: PriceField, period: usize) -> Self {
        Self {
            input: TimeSeriesInput::from_source(source, period),
        }
    }
}

impl fmt::Display for RelativeStrengthLevy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RSL(")?;
        self.input.fmt_args(f)?;
        write!(f, ")")
    }
}

impl Indicator for RelativeStrengthLevy {
    fn period(&self) -> usize {
        self.input.period
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        relative_strength_levy(&self.input.values, self.input.period)
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

//! ROC (Rate of Change) indicator implementation.
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! If C[i-n] == 0: ROC = 0
//! Warmup: first n positions are 0.0.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{Indicator, TimeSeriesInput};
use crate::domain::ohlcv::{BarHistory, PriceField};
use std::fmt;

pub fn rate_of_change(input: &[f64], period: usize) -> Vec<f64> {
    let mut values = vec![0.0; input.len()];

    for i in period..input.len() {
        let prev = input[i - period];
        if prev != 0.0 {
            values[i] = ((input[i] - prev) / prev) * 100.0;
        }
    }
    values
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateOfChange {
    pub input: TimeSeriesInput,
}

impl RateOfChange {
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

impl fmt::Display for RateOfChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ROC(")?;
        self.input.fmt_args(f)?;
        write!(f, ")")
    }
}

impl Indicator for RateOfChange {
    fn period(&self) -> usize {
        self.input.period
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        Ok(rate_of_change(&self.input.values, self.input.period))
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

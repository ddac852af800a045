//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - gain[0] = loss[0] = 0, then per-step gains/losses from index 1
//! - First average: simple mean of gain[0..n] / loss[0..n]
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: positions 0..=n-1 are 0.0. The seed position n-1 is deliberately
//! left at 0.0 as the "no value yet" marker; the first reported RSI is at n.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{Indicator, TimeSeriesInput};
use crate::domain::ohlcv::{BarHistory, PriceField};
use std::fmt;

/// Empty output when there are fewer than `period` values.
pub fn relative_strength_index(input: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::ZeroPeriod);
    }
    if input.len() < period {
        return Ok(Vec::new());
    }

    let mut gains = vec![0.0; input.len()];
    let mut losses = vec![0.0; input.len()];
    for i in 1..input.len() {
        let change = input[i] - input[i - 1];
        gains[i] = change.max(0.0);
        losses[i] = (-change).max(0.0);
    }

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;

    let mut values = vec![0.0; input.len()];
    for i in period..input.len() {
        avg_gain = (avg_gain * (n - 1.0) + gains[i]) / n;
        avg_loss = (avg_loss * (n - 1.0) + losses[i]) / n;
        values[i] = rsi(avg_gain, avg_loss);
    }

    Ok(values)
}

fn rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelativeStrengthIndex {
    pub input: TimeSeriesInput,
}

impl RelativeStrengthIndex {
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

impl fmt::Display for RelativeStrengthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RSI(")?;
        self.input.fmt_args(f)?;
        write!(f, ")")
    }
}

impl Indicator for RelativeStrengthIndex {
    fn period(&self) -> usize {
        self.input.period
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        relative_strength_index(&self.input.values, self.input.period)
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_data::sample_bars;

    #[test]
    fn rsi_empty_input() {
        assert!(relative_strength_index(&[], 14).unwrap().is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        let input: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        assert!(relative_strength_index(&input, 14).unwrap().is_empty());
    }

    #[test]
    fn rsi_zero_period() {
        assert_eq!(
            relative_strength_index(&[100.0, 101.0], 0),
            Err(IndicatorError::ZeroPeriod)
        );
    }

    #[test]
    fn rsi_warmup_period() {
        let input: Vec<f64> = (1..=20).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let values = relative_strength_index(&input, 14).unwrap();

        assert_eq!(values.len(), 20);
        for (i, v) in values.iter().enumerate().take(14) {
            assert_eq!(*v, 0.0, "position {} should be warmup", i);
        }
        assert!(values[14] > 0.0);
    }

    #[test]
    fn rsi_seed_position_is_zero_marker() {
        let input: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let values = relative_strength_index(&input, 14).unwrap();
        assert_eq!(values[13], 0.0);
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let input: Vec<f64> = (0..16).map(|i| 100.0 + i as f64).collect();
        let values = relative_strength_index(&input, 14).unwrap();
        assert!((values[14] - 100.0).abs() < f64::EPSILON);
        assert!((values[15] - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let input: Vec<f64> = (0..16).map(|i| 100.0 - i as f64).collect();
        let values = relative_strength_index(&input, 14).unwrap();
        assert!(values[14].abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_known_calculation() {
        let close = sample_bars().close().to_vec();
        let values = relative_strength_index(&close, 5).unwrap();

        // gains over [0..5): 0.51 + 1.64, losses: 0.84 + 1.33
        let mut avg_gain = (0.51 + 1.64) / 5.0;
        let mut avg_loss = (0.84 + 1.33) / 5.0;
        avg_gain = (avg_gain * 4.0 + (132.30 - 130.46)) / 5.0;
        avg_loss = (avg_loss * 4.0) / 5.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);

        assert!((values[5] - expected).abs() < 1e-9);
        assert_eq!(values[4], 0.0);
    }

    #[test]
    fn rsi_in_range() {
        let input: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let values = relative_strength_index(&input, 14).unwrap();
        for v in values {
            assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
        }
    }

    #[test]
    fn rsi_indicator_display() {
        assert_eq!(
            RelativeStrengthIndex::from_source(PriceField::Close, 14).to_string(),
            "RSI(14)"
        );
    }
}

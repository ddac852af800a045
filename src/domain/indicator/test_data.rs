//! Shared fixtures for indicator unit tests.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::Indicator;
use crate::domain::ohlcv::BarHistory;

/// 32 daily bars of a large-cap equity.
pub fn sample_bars() -> BarHistory {
    BarHistory::new(
        vec![
            127.75, 130.00, 130.40, 129.86, 130.86, 130.30, 132.10, 133.75, 134.41, 133.44,
            133.44, 134.87, 136.14, 136.51, 137.91, 140.09, 143.50, 141.60, 142.76, 146.17,
            144.00, 148.00, 149.17, 148.53, 143.78, 143.51, 145.51, 145.89, 147.50, 148.20,
            149.03, 144.84,
        ],
        vec![
            130.49, 130.60, 130.89, 132.55, 131.51, 132.41, 134.08, 134.32, 134.64, 133.89,
            135.245, 136.49, 137.41, 137.33, 140.00, 143.15, 144.89, 144.06, 145.65, 146.32,
            147.46, 149.57, 150.00, 149.76, 144.07, 147.10, 146.13, 148.195, 148.72, 149.83,
            149.21, 146.97,
        ],
        vec![
            127.07, 129.39, 128.461, 129.65, 130.24, 129.21, 131.62, 133.23, 132.93, 132.81,
            133.35, 134.35, 135.87, 135.76, 137.745, 140.07, 142.66, 140.67, 142.6522, 144.00,
            143.63, 147.68, 147.09, 145.88, 141.67, 142.96, 144.63, 145.81, 146.92, 147.70,
            145.55, 142.54,
        ],
        vec![
            130.48, 129.64, 130.15, 131.79, 130.46, 132.30, 133.98, 133.70, 133.41, 133.11,
            134.78, 136.33, 136.96, 137.27, 139.96, 142.02, 144.57, 143.24, 145.11, 144.50,
            145.64, 149.15, 148.48, 146.39, 142.45, 146.15, 145.40, 146.80, 148.56, 148.99,
            146.77, 144.98,
        ],
        vec![
            94601581, 62273470, 91339136, 96268773, 108467705, 78643119, 74473566, 59921548,
            68358848, 69429845, 61910717, 62012618, 62951963, 52094428, 78690866, 107697800,
            104465525, 105315267, 99223602, 76056394, 100543496, 126131926, 103957709,
            88965258, 116689470, 95243988, 71526938, 75328510, 70914977, 71859963, 103551959,
            114096651,
        ],
    )
    .unwrap()
}

/// Bars whose open/high/low/close all equal `closes[i]`.
pub fn flat_bars(closes: &[f64]) -> BarHistory {
    BarHistory::new(
        closes.to_vec(),
        closes.to_vec(),
        closes.to_vec(),
        closes.to_vec(),
        vec![1000; closes.len()],
    )
    .unwrap()
}

pub fn assert_series_close(got: &[f64], want: &[f64], tolerance: f64) {
    assert_eq!(
        got.len(),
        want.len(),
        "length mismatch: {} != {}",
        got.len(),
        want.len()
    );
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        assert!(
            (g - w).abs() < tolerance,
            "{} != {} at index {}",
            g,
            w,
            i
        );
    }
}

/// An indicator that ignores its bars and reports fixed values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedIndicator {
    pub values: Vec<f64>,
}

impl FixedIndicator {
    pub fn boxed(values: &[f64]) -> Box<dyn Indicator> {
        Box::new(Self {
            values: values.to_vec(),
        })
    }
}

impl std::fmt::Display for FixedIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FIXED")
    }
}

impl Indicator for FixedIndicator {
    fn period(&self) -> usize {
        0
    }

    fn bind(&mut self, _bars: &BarHistory) {}

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        Ok(self.values.clone())
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

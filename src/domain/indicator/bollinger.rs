//! Bollinger Bands.
//!
//! - Mean: moving average of kind `k` over n periods
//! - Upper: Mean + factor × StdDev
//! - Lower: Mean - factor × StdDev
//! - Width: Upper - Lower
//!
//! StdDev is the population standard deviation of the trailing n values.
//! Warmup: first (n-1) positions are 0.0 in all four sequences.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::moving_average::{moving_average, MaKind};
use crate::domain::indicator::stats::stddev;
use crate::domain::indicator::{check_input, Indicator, TimeSeriesInput};
use crate::domain::ohlcv::{BarHistory, PriceField};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub mean: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

pub fn bollinger_bands(
    input: &[f64],
    period: usize,
    factor: f64,
    kind: MaKind,
) -> Result<BollingerBands, IndicatorError> {
    check_input(input, period)?;
    if factor.is_nan() || factor < 0.0 {
        return Err(IndicatorError::NegativeFactor(factor));
    }

    let mean = moving_average(input, period, kind)?;
    let mut upper = vec![0.0; input.len()];
    let mut lower = vec![0.0; input.len()];
    let mut width = vec![0.0; input.len()];

    for i in (period - 1)..input.len() {
        let band = factor * stddev(&input[i + 1 - period..=i])?;
        upper[i] = mean[i] + band;
        lower[i] = mean[i] - band;
        width[i] = upper[i] - lower[i];
    }

    Ok(BollingerBands {
        mean,
        upper,
        lower,
        width,
    })
}

/// Which of the four band sequences a [`Bollinger`] indicator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandField {
    Upper,
    #[default]
    Middle,
    Lower,
    Width,
}

impl BandField {
    pub fn keyword(self) -> &'static str {
        match self {
            BandField::Upper => "BB_UPPER",
            BandField::Middle => "BB_MIDDLE",
            BandField::Lower => "BB_LOWER",
            BandField::Width => "BB_WIDTH",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "BB_UPPER" => Some(BandField::Upper),
            "BB_MIDDLE" => Some(BandField::Middle),
            "BB_LOWER" => Some(BandField::Lower),
            "BB_WIDTH" => Some(BandField::Width),
            _ => None,
        }
    }

    fn select(self, bands: BollingerBands) -> Vec<f64> {
        match self {
            BandField::Upper => bands.upper,
            BandField::Middle => bands.mean,
            BandField::Lower => bands.lower,
            BandField::Width => bands.width,
        }
    }
}

/// One band of the Bollinger envelope as a filterable indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Bollinger {
    pub input: TimeSeriesInput,
    pub factor: f64,
    pub kind: MaKind,
    pub field: BandField,
}

impl Bollinger {
    pub fn new(values: Vec<f64>, period: usize, factor: f64, kind: MaKind, field: BandField) -> Self {
        Self {
            input: TimeSeriesInput::new(values, period),
            factor,
            kind,
            field,
        }
    }

    pub fn from_source(
        source: PriceField,
        period: usize,
        factor: f64,
        kind: MaKind,
        field: BandField,
    ) -> Self {
        Self {
            input: TimeSeriesInput::from_source(source, period),
            factor,
            kind,
            field,
        }
    }
}

impl fmt::Display for Bollinger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{}", self.field.keyword(), self.input.period, self.factor)?;
        if self.kind != MaKind::Sma {
            write!(f, ",{}", self.kind)?;
        }
        write!(f, ")")
    }
}

impl Indicator for Bollinger {
    fn period(&self) -> usize {
        self.input.period
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        let bands = bollinger_bands(&self.input.values, self.input.period, self.factor, self.kind)?;
        Ok(self.field.select(bands))
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_data::assert_series_close;
    use proptest::prelude::*;

    const INPUT: [f64; 23] = [
        90.7043, 92.9001, 92.9784, 91.8021, 92.6647, 92.6843, 92.3021, 92.7725, 92.5373, 92.9490,
        93.2039, 91.0669, 89.8318, 89.7435, 90.3994, 90.7387, 88.0177, 88.0867, 88.8439, 90.7781,
        90.5416, 91.3894, 90.6500,
    ];

    const MEAN_5: [f64; 23] = [
        0.0, 0.0, 0.0, 0.0, 92.209920, 92.605920, 92.486320, 92.445140, 92.592180, 92.649040,
        92.752960, 92.505920, 91.917780, 91.359020, 90.849100, 90.356060, 89.746220, 89.397200,
        89.217280, 89.293020, 89.253600, 89.927940, 90.440600,
    ];

    #[test]
    fn bands_period_5_factor_2() {
        let upper = [
            0.0, 0.0, 0.0, 0.0, 93.931999, 93.445448, 93.293910, 93.164323, 92.918883, 93.086592,
            93.380300, 94.009602, 94.475378, 94.320001, 93.387131, 91.377300, 91.623830,
            91.685323, 91.509657, 91.755346, 91.626784, 92.426023, 92.141806,
        ];
        let lower = [
            0.0, 0.0, 0.0, 0.0, 90.487841, 91.766392, 91.678730, 91.725957, 92.265477, 92.211488,
            92.125620, 91.002238, 89.360182, 88.398039, 88.311069, 89.334820, 87.868610,
            87.109077, 86.924903, 86.830694, 86.880416, 87.429857, 88.739394,
        ];
        let width = [
            0.0, 0.0, 0.0, 0.0, 3.444157, 1.679055, 1.615180, 1.438365, 0.653407, 0.875104,
            1.254680, 3.007364, 5.115196, 5.921961, 5.076062, 2.042480, 3.755220, 4.576245,
            4.584755, 4.924652, 4.746368, 4.996166, 3.402412,
        ];

        let bands = bollinger_bands(&INPUT, 5, 2.0, MaKind::Sma).unwrap();
        assert_series_close(&bands.mean, &MEAN_5, 1e-4);
        assert_series_close(&bands.upper, &upper, 1e-4);
        assert_series_close(&bands.lower, &lower, 1e-4);
        assert_series_close(&bands.width, &width, 1e-4);
    }

    #[test]
    fn bands_period_5_factor_0_collapse() {
        let bands = bollinger_bands(&INPUT, 5, 0.0, MaKind::Sma).unwrap();
        assert_series_close(&bands.mean, &MEAN_5, 1e-4);
        assert_series_close(&bands.upper, &MEAN_5, 1e-4);
        assert_series_close(&bands.lower, &MEAN_5, 1e-4);
        assert!(bands.width.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn bands_period_20_factor_2() {
        let bands = bollinger_bands(&INPUT, 20, 2.0, MaKind::Sma).unwrap();
        assert!(bands.upper[..19].iter().all(|&v| v == 0.0));
        assert_series_close(
            &bands.mean[19..],
            &[91.250270, 91.242135, 91.166600, 91.050180],
            1e-4,
        );
        assert_series_close(
            &bands.upper[19..],
            &[94.534271, 94.532306, 94.369251, 94.148503],
            1e-4,
        );
        assert_series_close(
            &bands.lower[19..],
            &[87.966269, 87.951964, 87.963949, 87.951857],
            1e-4,
        );
        assert_series_close(
            &bands.width[19..],
            &[6.568003, 6.580342, 6.405301, 6.196647],
            1e-4,
        );
    }

    #[test]
    fn bands_reject_negative_factor() {
        assert_eq!(
            bollinger_bands(&INPUT, 5, -1.0, MaKind::Sma),
            Err(IndicatorError::NegativeFactor(-1.0))
        );
        assert!(bollinger_bands(&INPUT, 5, f64::NAN, MaKind::Sma).is_err());
    }

    #[test]
    fn bands_share_input_checks() {
        assert_eq!(
            bollinger_bands(&[], 5, 2.0, MaKind::Sma),
            Err(IndicatorError::EmptyInput)
        );
        assert_eq!(
            bollinger_bands(&INPUT, 0, 2.0, MaKind::Sma),
            Err(IndicatorError::ZeroPeriod)
        );
        assert_eq!(
            bollinger_bands(&INPUT, 30, 2.0, MaKind::Sma),
            Err(IndicatorError::PeriodTooLarge { period: 30, len: 23 })
        );
    }

    #[test]
    fn bands_use_selected_average() {
        let bands = bollinger_bands(&INPUT, 5, 2.0, MaKind::Ema).unwrap();
        let ema = moving_average(&INPUT, 5, MaKind::Ema).unwrap();
        assert_eq!(bands.mean, ema);
        for i in 4..INPUT.len() {
            assert!(((bands.upper[i] - bands.mean[i]) - (bands.mean[i] - bands.lower[i])).abs() < 1e-9);
        }
    }

    #[test]
    fn bollinger_indicator_selects_band() {
        let bars = crate::domain::indicator::test_data::flat_bars(&INPUT);
        let upper = Bollinger::from_source(PriceField::Close, 5, 2.0, MaKind::Sma, BandField::Upper);
        let width = Bollinger::from_source(PriceField::Close, 5, 2.0, MaKind::Sma, BandField::Width);

        let expected = bollinger_bands(&INPUT, 5, 2.0, MaKind::Sma).unwrap();
        assert_eq!(upper.compute_on(&bars).unwrap(), expected.upper);
        assert_eq!(width.compute_on(&bars).unwrap(), expected.width);
    }

    #[test]
    fn bollinger_indicator_display() {
        let sma = Bollinger::from_source(PriceField::Close, 20, 2.0, MaKind::Sma, BandField::Upper);
        assert_eq!(sma.to_string(), "BB_UPPER(20,2)");

        let ema = Bollinger::from_source(PriceField::Close, 10, 1.5, MaKind::Ema, BandField::Width);
        assert_eq!(ema.to_string(), "BB_WIDTH(10,1.5,EMA)");
    }

    #[test]
    fn band_keywords() {
        assert_eq!(BandField::from_keyword("bb_lower"), Some(BandField::Lower));
        assert_eq!(BandField::from_keyword("BB_SIDEWAYS"), None);
        assert_eq!(BandField::Middle.keyword(), "BB_MIDDLE");
    }

    proptest! {
        #[test]
        fn zero_factor_collapses_bands(
            input in prop::collection::vec(1.0f64..1000.0, 1..60),
            period in 1usize..20,
        ) {
            prop_assume!(period <= input.len());
            let bands = bollinger_bands(&input, period, 0.0, MaKind::Sma).unwrap();
            prop_assert_eq!(&bands.upper, &bands.mean);
            prop_assert_eq!(&bands.lower, &bands.mean);
            prop_assert!(bands.width.iter().all(|&w| w == 0.0));
        }
    }
}

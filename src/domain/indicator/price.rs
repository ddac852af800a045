//! Raw price column as an indicator, so filters can compare e.g. `CLOSE > SMA(200)`.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{BarHistoryInput, Indicator};
use crate::domain::ohlcv::{BarHistory, PriceField};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Price {
    pub input: BarHistoryInput,
    pub field: PriceField,
}

impl Price {
    pub fn new(field: PriceField) -> Self {
        Self {
            input: BarHistoryInput::unbound(0),
            field,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field)
    }
}

impl Indicator for Price {
    fn period(&self) -> usize {
        0
    }

    fn bind(&mut self, bars: &BarHistory) {
        self.input.bind(bars);
    }

    fn compute(&self) -> Result<Vec<f64>, IndicatorError> {
        Ok(self.input.bars.column(self.field))
    }

    fn box_clone(&self) -> Box<dyn Indicator> {
        Box::new(self.clone())
    }
}

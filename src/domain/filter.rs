//! Watchlist filters.
//!
//! A filter compares the *last* value of an indicator against either a
//! literal or the last value of a second indicator computed on the same bars.

use crate::domain::error::WatchlistError;
use crate::domain::indicator::Indicator;
use crate::domain::ohlcv::BarHistory;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Lt,
    Gt,
    Le,
    Ge,
}

impl Comparison {
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Lt => left < right,
            Comparison::Gt => left > right,
            Comparison::Le => left <= right,
            Comparison::Ge => left >= right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Gt => ">",
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Comparison {
    type Err = WatchlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "<" | "LT" => Ok(Comparison::Lt),
            ">" | "GT" => Ok(Comparison::Gt),
            "<=" | "LE" => Ok(Comparison::Le),
            ">=" | "GE" => Ok(Comparison::Ge),
            _ => Err(WatchlistError::UnknownOperator(s.to_string())),
        }
    }
}

/// Right-hand side of a filter.
#[derive(Debug, Clone)]
pub enum ComparisonOperand {
    Literal(f64),
    Indicator(Box<dyn Indicator>),
}

impl ComparisonOperand {
    fn resolve(&self, bars: &BarHistory) -> Result<f64, WatchlistError> {
        match self {
            ComparisonOperand::Literal(value) => Ok(*value),
            ComparisonOperand::Indicator(indicator) => last_value(indicator.as_ref(), bars),
        }
    }
}

impl From<f64> for ComparisonOperand {
    fn from(value: f64) -> Self {
        ComparisonOperand::Literal(value)
    }
}

impl From<Box<dyn Indicator>> for ComparisonOperand {
    fn from(indicator: Box<dyn Indicator>) -> Self {
        ComparisonOperand::Indicator(indicator)
    }
}

impl fmt::Display for ComparisonOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperand::Literal(value) => write!(f, "{}", value),
            ComparisonOperand::Indicator(indicator) => write!(f, "{}", indicator),
        }
    }
}

/// Last computed value of `indicator` over `bars`.
///
/// An empty output (not enough history) is reported as `InsufficientData`.
pub fn last_value(indicator: &dyn Indicator, bars: &BarHistory) -> Result<f64, WatchlistError> {
    let values = indicator.compute_on(bars)?;
    values
        .last()
        .copied()
        .ok_or_else(|| WatchlistError::InsufficientData {
            indicator: indicator.to_string(),
        })
}

#[derive(Debug, Clone)]
pub struct Filter {
    pub indicator: Box<dyn Indicator>,
    pub operator: Comparison,
    pub value: ComparisonOperand,
}

impl Filter {
    pub fn new(
        indicator: Box<dyn Indicator>,
        operator: Comparison,
        value: impl Into<ComparisonOperand>,
    ) -> Self {
        Self {
            indicator,
            operator,
            value: value.into(),
        }
    }

    pub fn evaluate(&self, bars: &BarHistory) -> Result<bool, WatchlistError> {
        let left = last_value(self.indicator.as_ref(), bars)?;
        let right = self.value.resolve(bars)?;
        Ok(self.operator.apply(left, right))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.indicator, self.operator, self.value)
    }
}

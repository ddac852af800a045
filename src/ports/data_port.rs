//! Market data port trait.

use crate::domain::error::TradekitError;
use crate::domain::ohlcv::BarHistory;

/// A source of daily bar histories.
///
/// Implementations are shared across the screening threads.
pub trait DataPort: Send + Sync {
    /// The most recent `lookback` bars for `symbol`, oldest first.
    ///
    /// Fails with `InsufficientData` when fewer than `lookback` bars exist.
    fn fetch_bars(&self, symbol: &str, lookback: usize) -> Result<BarHistory, TradekitError>;

    fn list_symbols(&self) -> Result<Vec<String>, TradekitError>;
}

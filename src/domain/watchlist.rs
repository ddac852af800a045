//! Watchlist: assets plus the filters and ranking applied to them each cycle.

use crate::domain::error::WatchlistError;
use crate::domain::filter::{last_value, Filter};
use crate::domain::indicator::Indicator;
use crate::domain::ohlcv::BarHistory;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub id: String,
    pub rank: f64,
}

impl Asset {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankOrder {
    Ascending,
    #[default]
    Descending,
}

impl fmt::Display for RankOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankOrder::Ascending => f.write_str("ascending"),
            RankOrder::Descending => f.write_str("descending"),
        }
    }
}

impl FromStr for RankOrder {
    type Err = WatchlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(RankOrder::Ascending),
            "desc" | "descending" => Ok(RankOrder::Descending),
            _ => Err(WatchlistError::UnknownRankOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ranking {
    pub indicator: Box<dyn Indicator>,
    pub order: RankOrder,
}

impl Ranking {
    pub fn new(indicator: Box<dyn Indicator>, order: RankOrder) -> Self {
        Self { indicator, order }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    pub assets: Vec<Asset>,
    pub filters: Vec<Filter>,
    pub ranking: Option<Ranking>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    pub fn set_assets(&mut self, assets: Vec<Asset>) {
        self.assets = assets;
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn set_ranking(&mut self, ranking: Ranking) {
        self.ranking = Some(ranking);
    }

    /// `true` iff every filter passes. Stops at the first failing filter.
    ///
    /// Evaluation errors are wrapped in `FilterFailed`, naming `symbol` and
    /// the filter.
    pub fn apply_filters(&self, symbol: &str, bars: &BarHistory) -> Result<bool, WatchlistError> {
        for filter in &self.filters {
            let passed = filter
                .evaluate(bars)
                .map_err(|e| WatchlistError::FilterFailed {
                    symbol: symbol.to_string(),
                    filter: filter.to_string(),
                    source: Box::new(e),
                })?;
            if !passed {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Store the ranking indicator's last value in `asset.rank`.
    ///
    /// Leaves the asset untouched when no ranking is configured.
    pub fn apply_ranking(&self, asset: &mut Asset, bars: &BarHistory) -> Result<(), WatchlistError> {
        if let Some(ranking) = &self.ranking {
            asset.rank = last_value(ranking.indicator.as_ref(), bars)?;
        }
        Ok(())
    }

    /// Stable sort by rank in the configured order; ascending when no
    /// ranking is set.
    pub fn rank_assets(&self, assets: &mut [Asset]) {
        let order = self
            .ranking
            .as_ref()
            .map(|r| r.order)
            .unwrap_or(RankOrder::Ascending);

        match order {
            RankOrder::Ascending => assets.sort_by(|a, b| a.rank.total_cmp(&b.rank)),
            RankOrder::Descending => assets.sort_by(|a, b| b.rank.total_cmp(&a.rank)),
        }
    }
}

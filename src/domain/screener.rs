//! One screening cycle over a watchlist.
//!
//! Assets are screened in parallel on the rayon pool (fetch bars, apply
//! filters, apply ranking). Outcomes are collected in watchlist order, then
//! the survivors are ranked.

use crate::domain::error::TradekitError;
use crate::domain::watchlist::{Asset, Watchlist};
use crate::ports::data_port::DataPort;
use rayon::prelude::*;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct FailedAsset {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReport {
    /// Assets that passed every filter, in ranking order.
    pub ranked: Vec<Asset>,
    pub rejected: Vec<String>,
    pub failed: Vec<FailedAsset>,
}

enum Outcome {
    Passed(Asset),
    Rejected(String),
    Failed(FailedAsset),
}

pub fn run_screen(watchlist: &Watchlist, data_port: &dyn DataPort, lookback: usize) -> ScreenReport {
    let outcomes: Vec<Outcome> = watchlist
        .assets
        .par_iter()
        .map(|asset| screen_asset(watchlist, data_port, asset, lookback))
        .collect();

    let mut report = ScreenReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Passed(asset) => report.ranked.push(asset),
            Outcome::Rejected(symbol) => report.rejected.push(symbol),
            Outcome::Failed(failed) => report.failed.push(failed),
        }
    }
    watchlist.rank_assets(&mut report.ranked);

    info!(
        passed = report.ranked.len(),
        rejected = report.rejected.len(),
        failed = report.failed.len(),
        "screening cycle complete"
    );
    report
}

fn screen_asset(
    watchlist: &Watchlist,
    data_port: &dyn DataPort,
    asset: &Asset,
    lookback: usize,
) -> Outcome {
    let symbol = asset.symbol.as_str();

    match evaluate_asset(watchlist, data_port, asset, lookback) {
        Ok(Some(ranked)) => {
            debug!(symbol, rank = ranked.rank, "asset passed filters");
            Outcome::Passed(ranked)
        }
        Ok(None) => {
            debug!(symbol, "asset rejected by filters");
            Outcome::Rejected(symbol.to_string())
        }
        Err(e) => {
            warn!(symbol, error = %e, "skipping asset");
            Outcome::Failed(FailedAsset {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

fn evaluate_asset(
    watchlist: &Watchlist,
    data_port: &dyn DataPort,
    asset: &Asset,
    lookback: usize,
) -> Result<Option<Asset>, TradekitError> {
    let bars = data_port.fetch_bars(&asset.symbol, lookback)?;
    debug!(symbol = %asset.symbol, bars = bars.len(), "fetched bars");

    if !watchlist.apply_filters(&asset.symbol, &bars)? {
        return Ok(None);
    }

    let mut ranked = asset.clone();
    watchlist.apply_ranking(&mut ranked, &bars)?;
    Ok(Some(ranked))
}

//! Watchlist configuration loading and validation.
//!
//! Reads the `[data]` and `[watchlist]` sections and turns them into a
//! ready-to-run [`Watchlist`]. Filters are read from `filter_1`,
//! `filter_2`, ... until the first missing key.

use crate::domain::error::{TradekitError, WatchlistError};
use crate::domain::filter_parser::{parse_filter, parse_indicator};
use crate::domain::watchlist::{Asset, RankOrder, Ranking, Watchlist};
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_LOOKBACK: i64 = 100;

#[derive(Debug, Clone)]
pub struct WatchlistConfig {
    pub data_path: Option<PathBuf>,
    pub lookback: usize,
    pub watchlist: Watchlist,
}

pub fn validate_watchlist_config(config: &dyn ConfigPort) -> Result<(), TradekitError> {
    load_watchlist_config(config).map(|_| ())
}

pub fn load_watchlist_config(config: &dyn ConfigPort) -> Result<WatchlistConfig, TradekitError> {
    let lookback = read_lookback(config)?;
    let data_path = config.get_string("data", "path").map(PathBuf::from);

    let mut watchlist = Watchlist::new();
    for symbol in read_symbols(config)? {
        watchlist.add_asset(Asset::new(symbol));
    }

    for (key, expr) in filter_entries(config) {
        let filter = parse_filter(&expr).map_err(|e| invalid_expression("watchlist", &key, e))?;
        watchlist.add_filter(filter);
    }

    if let Some(ranking) = read_ranking(config)? {
        watchlist.set_ranking(ranking);
    }

    Ok(WatchlistConfig {
        data_path,
        lookback,
        watchlist,
    })
}

/// Split a comma-separated symbol list, upper-casing each entry.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, String> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err("empty token in symbol list".to_string());
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(format!("duplicate symbol: {}", symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// `(key, expression)` for every consecutive `filter_N` entry.
pub fn filter_entries(config: &dyn ConfigPort) -> Vec<(String, String)> {
    (1..)
        .map(|n| format!("filter_{}", n))
        .map_while(|key| config.get_string("watchlist", &key).map(|expr| (key, expr)))
        .collect()
}

fn read_lookback(config: &dyn ConfigPort) -> Result<usize, TradekitError> {
    let invalid = |reason: String| TradekitError::ConfigInvalid {
        section: "data".to_string(),
        key: "lookback".to_string(),
        reason,
    };

    let value = config
        .get_int("data", "lookback")
        .map_err(invalid)?
        .unwrap_or(DEFAULT_LOOKBACK);
    if value < 1 {
        return Err(invalid("lookback must be at least 1".to_string()));
    }
    Ok(value as usize)
}

fn read_symbols(config: &dyn ConfigPort) -> Result<Vec<String>, TradekitError> {
    match config.get_string("watchlist", "symbols") {
        Some(s) => parse_symbols(&s).map_err(|reason| TradekitError::ConfigInvalid {
            section: "watchlist".to_string(),
            key: "symbols".to_string(),
            reason,
        }),
        None => Err(TradekitError::ConfigMissing {
            section: "watchlist".to_string(),
            key: "symbols".to_string(),
        }),
    }
}

fn read_ranking(config: &dyn ConfigPort) -> Result<Option<Ranking>, TradekitError> {
    let order = match config.get_string("watchlist", "order") {
        Some(s) => s
            .parse::<RankOrder>()
            .map_err(|e| invalid_expression("watchlist", "order", e))?,
        None => RankOrder::default(),
    };

    config
        .get_string("watchlist", "ranking")
        .map(|expr| {
            parse_indicator(&expr)
                .map(|indicator| Ranking::new(indicator, order))
                .map_err(|e| invalid_expression("watchlist", "ranking", e))
        })
        .transpose()
}

fn invalid_expression(section: &str, key: &str, err: WatchlistError) -> TradekitError {
    TradekitError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: err.to_string(),
    }
}

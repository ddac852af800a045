//! CLI definition and dispatch.
//!
//! Each subcommand has a `Result`-returning worker so it can be driven from
//! tests; [`run`] prints the outcome and maps errors to exit codes.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{load_watchlist_config, WatchlistConfig};
use crate::domain::error::{TradekitError, WatchlistError};
use crate::domain::filter_parser::parse_indicator;
use crate::domain::ohlcv::BarHistory;
use crate::domain::screener::{run_screen, ScreenReport};
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "tradekit", about = "Technical indicators and watchlist screening")]
pub struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one screening cycle over a watchlist
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <SYMBOL>.csv files, overrides [data] path
        #[arg(long)]
        data: Option<PathBuf>,
        /// Print only the first N ranked assets
        #[arg(long)]
        top: Option<usize>,
    },
    /// Validate a watchlist configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print one indicator series for a symbol
    Compute {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Indicator expression, e.g. "RSI(14)" or "BB_UPPER(20,2)"
        #[arg(short, long)]
        indicator: String,
        /// Use only the most recent N bars
        #[arg(long)]
        lookback: Option<usize>,
    },
    /// List symbols with data files in a directory
    ListSymbols {
        #[arg(long)]
        data: PathBuf,
    },
}

/// Install the `tracing` subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Screen { config, data, top } => {
            screen(&config, data.as_deref()).map(|report| print!("{}", format_report(&report, top)))
        }
        Command::Validate { config } => validate(&config),
        Command::Compute {
            data,
            symbol,
            indicator,
            lookback,
        } => compute_series(&data, &symbol, &indicator, lookback).map(|series| {
            for (date, value) in series {
                println!("{}\t{:.4}", date, value);
            }
        }),
        Command::ListSymbols { data } => CsvAdapter::new(data).list_symbols().map(|symbols| {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols found", symbols.len());
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradekitError> {
    FileConfigAdapter::from_file(path).map_err(|e| TradekitError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load, validate and screen the watchlist described by `config_path`.
pub fn screen(config_path: &Path, data_override: Option<&Path>) -> Result<ScreenReport, TradekitError> {
    info!(config = %config_path.display(), "loading watchlist");
    let WatchlistConfig {
        data_path,
        lookback,
        watchlist,
    } = load_watchlist_config(&load_config(config_path)?)?;

    let data_path = data_override
        .map(Path::to_path_buf)
        .or(data_path)
        .ok_or_else(|| TradekitError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        })?;
    debug!(
        data = %data_path.display(),
        lookback,
        assets = watchlist.assets.len(),
        filters = watchlist.filters.len(),
        "watchlist loaded"
    );

    let report = run_screen(&watchlist, &CsvAdapter::new(data_path), lookback);
    if !watchlist.assets.is_empty() && report.failed.len() == watchlist.assets.len() {
        return Err(TradekitError::Data {
            reason: "every symbol failed to screen".to_string(),
        });
    }
    Ok(report)
}

pub fn validate(config_path: &Path) -> Result<(), TradekitError> {
    eprintln!("Validating watchlist: {}", config_path.display());
    let config = load_watchlist_config(&load_config(config_path)?)?;
    let watchlist = &config.watchlist;

    eprintln!("  Symbols:  {}", watchlist.assets.len());
    eprintln!("  Lookback: {}", config.lookback);
    for (i, filter) in watchlist.filters.iter().enumerate() {
        eprintln!("  Filter {}: {}", i + 1, filter);
    }
    if let Some(ranking) = &watchlist.ranking {
        eprintln!("  Ranking:  {} ({})", ranking.indicator, ranking.order);
    }
    eprintln!("\nWatchlist configuration is valid.");
    Ok(())
}

/// Dated values of `expr` over the symbol's bars.
pub fn compute_series(
    data: &Path,
    symbol: &str,
    expr: &str,
    lookback: Option<usize>,
) -> Result<Vec<(NaiveDate, f64)>, TradekitError> {
    let indicator = parse_indicator(expr).map_err(|e| {
        if let WatchlistError::Parse(ref parse_err) = e {
            eprintln!("{}", parse_err.display_with_context(expr));
        }
        TradekitError::from(e)
    })?;

    let bars = CsvAdapter::new(data.to_path_buf()).read_bars(symbol)?;
    let start = lookback.map_or(0, |n| bars.len().saturating_sub(n));
    let window = &bars[start..];

    let values = indicator.compute_on(&BarHistory::from_bars(window))?;
    Ok(window.iter().map(|b| b.date).zip(values).collect())
}

/// Tab-separated ranking table, best first.
pub fn format_report(report: &ScreenReport, top: Option<usize>) -> String {
    let limit = top.unwrap_or(report.ranked.len());
    let mut out = String::new();

    let _ = writeln!(out, "rank\tsymbol\tvalue");
    for (i, asset) in report.ranked.iter().take(limit).enumerate() {
        let _ = writeln!(out, "{}\t{}\t{:.4}", i + 1, asset.symbol, asset.rank);
    }
    if !report.rejected.is_empty() {
        let _ = writeln!(out, "# rejected: {}", report.rejected.join(","));
    }
    for failed in &report.failed {
        let _ = writeln!(out, "# failed: {} ({})", failed.symbol, failed.reason);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::screener::FailedAsset;
    use crate::domain::watchlist::Asset;

    #[test]
    fn parses_screen_command() {
        let cli = Cli::try_parse_from([
            "tradekit", "-v", "screen", "-c", "watch.ini", "--data", "./bars", "--top", "5",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Screen { config, data, top } => {
                assert_eq!(config, PathBuf::from("watch.ini"));
                assert_eq!(data, Some(PathBuf::from("./bars")));
                assert_eq!(top, Some(5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_compute_command() {
        let cli = Cli::try_parse_from([
            "tradekit", "compute", "--data", "d", "--symbol", "AAPL", "-i", "RSI(14)",
        ])
        .unwrap();
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Compute { ref indicator, lookback: None, .. } if indicator == "RSI(14)"
        ));
    }

    #[test]
    fn rejects_missing_config() {
        assert!(Cli::try_parse_from(["tradekit", "validate"]).is_err());
    }

    #[test]
    fn load_config_missing_file_is_config_error() {
        let err = load_config(Path::new("/nonexistent/watchlist.ini")).unwrap_err();
        assert!(matches!(err, TradekitError::ConfigParse { .. }));
    }

    #[test]
    fn report_format() {
        let mut first = Asset::new("NVDA");
        first.rank = 12.5;
        let mut second = Asset::new("AAPL");
        second.rank = 3.0;
        let report = ScreenReport {
            ranked: vec![first, second],
            rejected: vec!["MSFT".to_string()],
            failed: vec![FailedAsset {
                symbol: "TSLA".to_string(),
                reason: "no data".to_string(),
            }],
        };

        let full = format_report(&report, None);
        assert_eq!(
            full,
            "rank\tsymbol\tvalue\n1\tNVDA\t12.5000\n2\tAAPL\t3.0000\n# rejected: MSFT\n# failed: TSLA (no data)\n"
        );

        let top = format_report(&report, Some(1));
        assert!(top.contains("NVDA"));
        assert!(!top.contains("\tAAPL"));
    }
}

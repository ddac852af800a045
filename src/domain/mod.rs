//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod filter;
pub mod filter_parser;
pub mod watchlist;
pub mod screener;
pub mod config_validation;
pub mod error;

//! Technical indicators and watchlist screening.
//!
//! Hexagonal architecture: indicator math and the watchlist engine in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`], command-line dispatch in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

//! Trendbot: a scheduled SMA-trend decision pass for a single brokerage account.
//!
//! One invocation fetches daily bars for the watchlist, ranks symbols by
//! `short SMA - long SMA`, sells held positions whose short average fell below
//! the long one, and buys at most one top-ranked symbol whose cooldown elapsed.

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod indicators;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod services;
pub mod signals;

//! Alpaca trading and market data REST integration

pub mod client;
pub mod messages;
pub mod provider;

pub use client::{AlpacaRestClient, BarsQuery};
pub use provider::AlpacaProvider;

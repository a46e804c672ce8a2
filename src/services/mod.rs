//! External collaborators: market data feed and brokerage account.

pub mod alpaca;
pub mod brokerage;
pub mod market_data;

pub use alpaca::{AlpacaProvider, AlpacaRestClient};
pub use brokerage::Brokerage;
pub use market_data::MarketDataProvider;

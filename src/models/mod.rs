//! Shared data models spanning the engine layers.

pub mod account;
pub mod company;
pub mod market;
pub mod order;
pub mod signal;

pub use account::{Account, MarketClock, Position};
pub use company::{company_info, CompanyInfo};
pub use market::{Bar, PriceSeries};
pub use order::{OrderAck, OrderRequest, OrderSide};
pub use signal::TrendSignal;

//! Cooldown ledger: last-buy day per symbol, persisted across runs.

pub mod cooldown;
pub mod lock;
pub mod store;

pub use cooldown::CooldownLedger;
pub use lock::{lock_path_for, RunLock};
pub use store::LedgerStore;

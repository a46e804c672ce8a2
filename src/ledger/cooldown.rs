use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last buy day per symbol.
///
/// Serialized as `{"last_trade_day": {"SYM": "YYYY-MM-DD"}}` with keys sorted,
/// so a flush followed by a load yields the same set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownLedger {
    #[serde(default)]
    last_trade_day: BTreeMap<String, NaiveDate>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_buy(&self, symbol: &str) -> Option<NaiveDate> {
        self.last_trade_day.get(symbol).copied()
    }

    /// Whole days since the last recorded buy, `None` if never bought
    pub fn days_since(&self, symbol: &str, today: NaiveDate) -> Option<i64> {
        self.last_buy(symbol).map(|last| (today - last).num_days())
    }

    /// True if the symbol was never bought or at least `wait_days` have passed
    pub fn can_buy(&self, symbol: &str, today: NaiveDate, wait_days: i64) -> bool {
        match self.days_since(symbol, today) {
            Some(days) => days >= wait_days,
            None => true,
        }
    }

    /// Upsert the last buy day. Records never move backwards in time;
    /// returns whether the ledger changed.
    pub fn record_buy(&mut self, symbol: &str, day: NaiveDate) -> bool {
        match self.last_trade_day.get(symbol) {
            Some(existing) if *existing >= day => false,
            _ => {
                self.last_trade_day.insert(symbol.to_string(), day);
                true
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.last_trade_day.iter().map(|(s, d)| (s.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.last_trade_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_trade_day.is_empty()
    }
}

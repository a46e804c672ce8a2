//! Buy/sell rules over one run's signals, positions and cooldown ledger.
//!
//! Pure functions of their inputs; order submission and ledger persistence
//! live in the runner.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::report::{Decision, SkipReason};
use crate::config::StrategyConfig;
use crate::ledger::CooldownLedger;
use crate::models::{Position, TrendSignal};

pub struct DecisionEngine<'a> {
    config: &'a StrategyConfig,
}

impl<'a> DecisionEngine<'a> {
    pub fn new(config: &'a StrategyConfig) -> Self {
        Self { config }
    }

    /// Sell the full long quantity of every held symbol whose short SMA is
    /// below its long SMA. Independent of cooldown.
    pub fn evaluate_sells(
        &self,
        positions: &[Position],
        signals: &HashMap<String, TrendSignal>,
    ) -> Vec<Decision> {
        positions
            .iter()
            .filter(|p| p.long_qty() > 0)
            .map(|p| match signals.get(&p.symbol) {
                Some(signal) if signal.is_bearish() => Decision::Sell {
                    symbol: p.symbol.clone(),
                    qty: p.long_qty(),
                    est_proceeds: p.long_qty() as f64 * signal.latest_close,
                },
                Some(_) => Decision::Hold {
                    symbol: p.symbol.clone(),
                },
                None => Decision::Skip {
                    symbol: Some(p.symbol.clone()),
                    reason: SkipReason::NoSignal,
                },
            })
            .collect()
    }

    /// Consider only the top-ranked symbol; lower ranks are never bought in the same run.
    ///
    /// Gates, in order: positive trend, cooldown elapsed, share-cap headroom,
    /// cash. A quantity that would exceed `max_shares` is clamped to the
    /// remaining headroom; zero headroom skips.
    pub fn evaluate_buy(
        &self,
        ranking: &[TrendSignal],
        positions: Option<&[Position]>,
        ledger: Option<&CooldownLedger>,
        cash: f64,
        today: NaiveDate,
    ) -> Decision {
        let Some(top) = ranking.first() else {
            return Decision::Skip {
                symbol: None,
                reason: SkipReason::NoCandidates,
            };
        };
        let skip = |reason: SkipReason| Decision::Skip {
            symbol: Some(top.symbol.clone()),
            reason,
        };

        if !top.is_bullish() {
            return skip(SkipReason::NonPositiveTrend {
                trend_score: top.trend_score,
            });
        }

        let Some(ledger) = ledger else {
            return skip(SkipReason::LedgerUnavailable);
        };
        if !ledger.can_buy(&top.symbol, today, self.config.wait_days) {
            return skip(SkipReason::Cooldown {
                days_since: ledger.days_since(&top.symbol, today).unwrap_or_default(),
                wait_days: self.config.wait_days,
            });
        }

        let Some(positions) = positions else {
            return skip(SkipReason::PositionsUnavailable);
        };
        let held = held_shares(positions, &top.symbol);
        let headroom = self.config.max_shares.saturating_sub(held);
        if headroom == 0 {
            return skip(SkipReason::AtMaxShares {
                held,
                max_shares: self.config.max_shares,
            });
        }

        let qty = self.config.shares_per_trade.min(headroom);
        let cost = qty as f64 * top.latest_close;
        if cash < cost {
            return skip(SkipReason::InsufficientCash { cash, cost });
        }

        Decision::Buy {
            symbol: top.symbol.clone(),
            qty,
            clamped: qty < self.config.shares_per_trade,
            est_cost: cost,
        }
    }
}

pub fn held_shares(positions: &[Position], symbol: &str) -> u32 {
    positions
        .iter()
        .filter(|p| p.symbol == symbol)
        .map(Position::long_qty)
        .sum()
}

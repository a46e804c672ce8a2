//! What a run decided and why

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::ledger::CooldownLedger;
use crate::models::{company_info, Account, TrendSignal};

/// Why a symbol was not traded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Nothing made it into the ranking
    NoCandidates,
    NonPositiveTrend { trend_score: f64 },
    Cooldown { days_since: i64, wait_days: i64 },
    AtMaxShares { held: u32, max_shares: u32 },
    InsufficientCash { cash: f64, cost: f64 },
    /// The cooldown store could not be read, so cooldown state is unknown
    LedgerUnavailable,
    /// Positions could not be read, so the share cap cannot be checked
    PositionsUnavailable,
    /// Held, but no usable price history this run
    NoSignal,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoCandidates => write!(f, "no ranked symbols"),
            SkipReason::NonPositiveTrend { trend_score } => {
                write!(f, "trend={:.4} is not positive", trend_score)
            }
            SkipReason::Cooldown { days_since, wait_days } => {
                write!(f, "waited={} (need {})", days_since, wait_days)
            }
            SkipReason::AtMaxShares { held, max_shares } => {
                write!(f, "at max shares (pos={}, max={})", held, max_shares)
            }
            SkipReason::InsufficientCash { cash, cost } => {
                write!(f, "cannot afford (cost={:.2}, cash={:.2})", cost, cash)
            }
            SkipReason::LedgerUnavailable => write!(f, "cooldown store unavailable"),
            SkipReason::PositionsUnavailable => write!(f, "positions unavailable"),
            SkipReason::NoSignal => write!(f, "no signal this run"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    Buy {
        symbol: String,
        qty: u32,
        /// Quantity was cut to the remaining headroom under the share cap
        clamped: bool,
        est_cost: f64,
    },
    Sell {
        symbol: String,
        qty: u32,
        est_proceeds: f64,
    },
    /// Held position whose trend does not call for a sell
    Hold { symbol: String },
    Skip {
        symbol: Option<String>,
        #[serde(flatten)]
        reason: SkipReason,
    },
}

impl Decision {
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Decision::Buy { symbol, .. }
            | Decision::Sell { symbol, .. }
            | Decision::Hold { symbol } => Some(symbol),
            Decision::Skip { symbol, .. } => symbol.as_deref(),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Buy {
                symbol,
                qty,
                clamped,
                est_cost,
            } => {
                write!(f, "buy {} qty={} est_cost={:.2}", symbol, qty, est_cost)?;
                if *clamped {
                    write!(f, " (clamped to max shares)")?;
                }
                Ok(())
            }
            Decision::Sell {
                symbol,
                qty,
                est_proceeds,
            } => write!(
                f,
                "sell {} qty={} est_proceeds={:.2}",
                symbol, qty, est_proceeds
            ),
            Decision::Hold { symbol } => write!(f, "hold {}", symbol),
            Decision::Skip { symbol: Some(s), reason } => write!(f, "no buy {}: {}", s, reason),
            Decision::Skip { symbol: None, reason } => write!(f, "no buy: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OrderOutcome {
    Submitted { order_id: String },
    Failed { error: String },
    /// `--dry-run`: decided but not sent
    NotSubmitted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub decision: Decision,
    /// `None` for decisions that place no order (hold, skip)
    pub outcome: Option<OrderOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    FetchFailed { symbol: String, error: String },
    InsufficientHistory {
        symbol: String,
        bars: usize,
        required: usize,
    },
    /// Enough bars, but the closes do not yield finite averages
    InvalidPrices { symbol: String },
    PositionsUnavailable { error: String },
    LedgerUnavailable { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarketStatus {
    Open,
    Closed { next_open: Option<DateTime<Utc>> },
    Unknown { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: &'static str,
    pub account: Account,
    pub cash_start: f64,
    /// Watchlist symbols with enough history, best first
    pub ranking: Vec<TrendSignal>,
    pub data_issues: Vec<DataIssue>,
    pub market: MarketStatus,
    pub decisions: Vec<DecisionRecord>,
    /// Cash after estimated sell proceeds and buy costs
    pub est_cash: f64,
    /// `None` when the store could not be loaded
    pub ledger: Option<CooldownLedger>,
    pub ledger_error: Option<String>,
    pub dry_run: bool,
}

impl RunReport {
    pub fn buys(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.decisions
            .iter()
            .filter(|r| matches!(r.decision, Decision::Buy { .. }))
    }

    pub fn sells(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.decisions
            .iter()
            .filter(|r| matches!(r.decision, Decision::Sell { .. }))
    }

    /// Orders the brokerage accepted
    pub fn submitted(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.decisions
            .iter()
            .filter(|r| matches!(r.outcome, Some(OrderOutcome::Submitted { .. })))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Using {} account | ID: {} | Cash: ${:.2} | Equity: ${:.2} | P/L vs start: ${:.2}",
            self.mode,
            self.account.id,
            self.account.cash,
            self.account.equity,
            self.account.equity - self.cash_start
        )?;

        writeln!(f, "Ranked symbols (best first):")?;
        for s in &self.ranking {
            let info = company_info(&s.symbol);
            writeln!(
                f,
                "- {} ({}, {}): trend={:.4} (short={:.2}, long={:.2}, last={:.2})",
                s.symbol,
                info.name,
                info.sector,
                s.trend_score,
                s.short_sma,
                s.long_sma,
                s.latest_close
            )?;
        }
        for issue in &self.data_issues {
            match issue {
                DataIssue::FetchFailed { symbol, error } => {
                    writeln!(f, "! {}: fetch failed: {}", symbol, error)?
                }
                DataIssue::InsufficientHistory {
                    symbol,
                    bars,
                    required,
                } => writeln!(
                    f,
                    "! {}: not enough daily bars (need {}, got {})",
                    symbol, required, bars
                )?,
                DataIssue::InvalidPrices { symbol } => {
                    writeln!(f, "! {}: closes are not finite", symbol)?
                }
                DataIssue::PositionsUnavailable { error } => {
                    writeln!(f, "! positions unavailable: {}", error)?
                }
                DataIssue::LedgerUnavailable { error } => {
                    writeln!(f, "! cooldown store unavailable: {}", error)?
                }
            }
        }

        match &self.market {
            MarketStatus::Open => {}
            MarketStatus::Closed { next_open } => {
                writeln!(f, "\n*** MARKET CLOSED *** No orders placed.")?;
                if let Some(next) = next_open {
                    writeln!(
                        f,
                        "    Next open: {}",
                        next.format("%a %b %d, %H:%M UTC")
                    )?;
                }
            }
            MarketStatus::Unknown { error } => {
                writeln!(
                    f,
                    "\n*** MARKET STATUS UNKNOWN *** No orders placed: {}",
                    error
                )?;
            }
        }

        if !self.decisions.is_empty() {
            writeln!(f)?;
        }
        for record in &self.decisions {
            match &record.outcome {
                Some(OrderOutcome::Submitted { order_id }) => {
                    writeln!(f, "{} [order {}]", record.decision, order_id)?
                }
                Some(OrderOutcome::Failed { error }) => {
                    writeln!(f, "{} [FAILED: {}]", record.decision, error)?
                }
                Some(OrderOutcome::NotSubmitted) => writeln!(f, "{} [dry run]", record.decision)?,
                None => writeln!(f, "{}", record.decision)?,
            }
        }

        writeln!(f, "\nState summary:")?;
        writeln!(f, "- estimated cash = ${:.2}", self.est_cash)?;
        match &self.ledger {
            Some(ledger) => {
                let entries: Vec<String> = ledger
                    .entries()
                    .map(|(s, d)| format!("{}={}", s, d))
                    .collect();
                writeln!(f, "- last_trade_day = {{{}}}", entries.join(", "))?;
            }
            None => writeln!(f, "- last_trade_day = <unavailable>")?,
        }
        if let Some(error) = &self.ledger_error {
            writeln!(f, "- cooldown store NOT saved: {}", error)?;
        }
        Ok(())
    }
}

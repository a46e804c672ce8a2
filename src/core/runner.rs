//! One decision pass: fetch, rank, sell, buy at most one, persist cooldown.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use super::context::RunContext;
use super::decision::DecisionEngine;
use super::report::{DataIssue, Decision, DecisionRecord, MarketStatus, OrderOutcome, RunReport};
use crate::config::StrategyConfig;
use crate::error::RunError;
use crate::ledger::{lock_path_for, LedgerStore, RunLock};
use crate::models::{OrderRequest, Position, PriceSeries, TrendSignal};
use crate::signals::SignalEngine;

pub struct TradingRun {
    ctx: RunContext,
    config: StrategyConfig,
    store: LedgerStore,
    mode: &'static str,
    dry_run: bool,
}

impl TradingRun {
    pub fn new(ctx: RunContext, config: StrategyConfig, store: LedgerStore) -> Self {
        Self {
            ctx,
            config,
            store,
            mode: "PAPER",
            dry_run: false,
        }
    }

    /// Label shown in the report ("PAPER" or "LIVE")
    pub fn with_mode(mut self, mode: &'static str) -> Self {
        self.mode = mode;
        self
    }

    /// Decide everything but submit no orders and never write the store
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute one pass as of `now`.
    ///
    /// Fails only for conditions that must stop a run before any order logic:
    /// another run holds the lock, or the account cannot be read.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunReport, RunError> {
        let today = now.date_naive();
        let _lock = RunLock::acquire(lock_path_for(self.store.path()))
            .map_err(RunError::Lock)?;

        let account = self
            .ctx
            .brokerage
            .get_account()
            .await
            .map_err(RunError::Auth)?;
        info!(
            mode = self.mode,
            account_id = %account.id,
            cash = account.cash,
            equity = account.equity,
            "TradingRun: using {} account",
            self.mode
        );

        let mut data_issues = Vec::new();

        let mut ledger = match self.store.load() {
            Ok(ledger) => Some(ledger),
            Err(e) => {
                error!(
                    error = %e,
                    "TradingRun: cooldown store unavailable, buys disabled for this run"
                );
                data_issues.push(DataIssue::LedgerUnavailable {
                    error: e.to_string(),
                });
                None
            }
        };

        let positions = match self.ctx.brokerage.list_positions().await {
            Ok(positions) => Some(positions),
            Err(e) => {
                error!(error = %e, "TradingRun: failed to list positions");
                data_issues.push(DataIssue::PositionsUnavailable {
                    error: e.to_string(),
                });
                None
            }
        };

        let signals = self
            .collect_signals(positions.as_deref(), &mut data_issues)
            .await;
        let ranking = SignalEngine::rank(
            self.config
                .watchlist
                .iter()
                .filter_map(|s| signals.get(s).cloned())
                .collect(),
        );
        for (rank, s) in ranking.iter().enumerate() {
            info!(
                rank = rank + 1,
                symbol = %s.symbol,
                trend = s.trend_score,
                short_sma = s.short_sma,
                long_sma = s.long_sma,
                last = s.latest_close,
                "TradingRun: ranked {}",
                s.symbol
            );
        }

        let mut report = RunReport {
            mode: self.mode,
            cash_start: self.config.cash_start,
            est_cash: account.cash,
            account,
            ranking,
            data_issues,
            market: MarketStatus::Open,
            decisions: Vec::new(),
            ledger: ledger.clone(),
            ledger_error: None,
            dry_run: self.dry_run,
        };

        report.market = match self.ctx.brokerage.get_clock().await {
            Ok(clock) if clock.is_open => MarketStatus::Open,
            Ok(clock) => MarketStatus::Closed {
                next_open: clock.next_open,
            },
            Err(e) => MarketStatus::Unknown {
                error: e.to_string(),
            },
        };
        if report.market != MarketStatus::Open {
            warn!(market = ?report.market, "TradingRun: market not open, no orders this run");
            return Ok(report);
        }

        let engine = DecisionEngine::new(&self.config);

        if let Some(positions) = positions.as_deref() {
            for decision in engine.evaluate_sells(positions, &signals) {
                let record = self.execute(decision).await;
                if let (
                    Decision::Sell { est_proceeds, .. },
                    Some(OrderOutcome::Submitted { .. }),
                ) = (&record.decision, &record.outcome)
                {
                    report.est_cash += est_proceeds;
                }
                report.decisions.push(record);
            }
        }

        let buy = engine.evaluate_buy(
            &report.ranking,
            positions.as_deref(),
            ledger.as_ref(),
            report.est_cash,
            today,
        );
        let record = self.execute(buy).await;

        if let (Decision::Buy { symbol, est_cost, .. }, Some(OrderOutcome::Submitted { .. })) =
            (&record.decision, &record.outcome)
        {
            report.est_cash -= est_cost;
            if let Some(ledger) = ledger.as_mut() {
                if ledger.record_buy(symbol, today) {
                    if let Err(e) = self.store.flush(ledger) {
                        error!(
                            error = %e,
                            symbol = %symbol,
                            "TradingRun: order placed but cooldown store not saved"
                        );
                        report.ledger_error = Some(e.to_string());
                    }
                }
                report.ledger = Some(ledger.clone());
            }
        }
        report.decisions.push(record);

        Ok(report)
    }

    /// Signals for the watchlist plus any held symbol outside it.
    ///
    /// Fetch failures and short histories are recorded and the symbol skipped.
    async fn collect_signals(
        &self,
        positions: Option<&[Position]>,
        data_issues: &mut Vec<DataIssue>,
    ) -> HashMap<String, TrendSignal> {
        let mut symbols: Vec<String> = self.config.watchlist.clone();
        for p in positions.unwrap_or_default() {
            if p.long_qty() > 0 && !symbols.contains(&p.symbol) {
                symbols.push(p.symbol.clone());
            }
        }

        let mut signals = HashMap::new();
        for symbol in symbols {
            let bars = match self
                .ctx
                .market_data
                .get_daily_bars(&symbol, self.config.lookback_days)
                .await
            {
                Ok(bars) => bars,
                Err(e) => {
                    warn!(
                        symbol = %symbol,
                        error = %e,
                        "TradingRun: market data fetch failed for {}",
                        symbol
                    );
                    data_issues.push(DataIssue::FetchFailed {
                        symbol,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let series = PriceSeries::new(symbol.clone(), bars);
            let signal = SignalEngine::evaluate(
                &series,
                self.config.short_window,
                self.config.long_window,
            );
            match signal {
                Some(signal) => {
                    signals.insert(symbol, signal);
                }
                None if series.len() >= self.config.long_window => {
                    warn!(symbol = %symbol, "TradingRun: unusable closes for {}", symbol);
                    data_issues.push(DataIssue::InvalidPrices { symbol });
                }
                None => {
                    warn!(
                        symbol = %symbol,
                        bars = series.len(),
                        required = self.config.long_window,
                        "TradingRun: not enough daily bars for {}",
                        symbol
                    );
                    data_issues.push(DataIssue::InsufficientHistory {
                        symbol,
                        bars: series.len(),
                        required: self.config.long_window,
                    });
                }
            }
        }
        signals
    }

    /// Submit the order a decision calls for, if any. Failures are recorded, not raised.
    async fn execute(&self, decision: Decision) -> DecisionRecord {
        let order = match &decision {
            Decision::Buy { symbol, qty, .. } => Some(OrderRequest::buy(symbol.clone(), *qty)),
            Decision::Sell { symbol, qty, .. } => {
                Some(OrderRequest::sell(symbol.clone(), *qty))
            }
            Decision::Hold { .. } | Decision::Skip { .. } => None,
        };
        let Some(order) = order else {
            info!(decision = %decision, "TradingRun: {}", decision);
            return DecisionRecord {
                decision,
                outcome: None,
            };
        };

        if self.dry_run {
            info!(
                decision = %decision,
                "TradingRun: dry run, not submitting {}",
                decision
            );
            return DecisionRecord {
                decision,
                outcome: Some(OrderOutcome::NotSubmitted),
            };
        }

        let outcome = match self.ctx.brokerage.submit_order(&order).await {
            Ok(ack) => {
                info!(
                    symbol = %order.symbol,
                    side = %order.side,
                    qty = order.qty,
                    order_id = %ack.id,
                    "TradingRun: {}",
                    decision
                );
                OrderOutcome::Submitted { order_id: ack.id }
            }
            Err(e) => {
                error!(
                    symbol = %order.symbol,
                    side = %order.side,
                    qty = order.qty,
                    error = %e,
                    "TradingRun: order rejected"
                );
                OrderOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        debug!(outcome = ?outcome, "TradingRun: order outcome");

        DecisionRecord {
            decision,
            outcome: Some(outcome),
        }
    }
}

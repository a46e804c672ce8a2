//! Trend evaluation and ranking over daily closes.

use crate::indicators::trend::calculate_sma;
use crate::models::{PriceSeries, TrendSignal};
use tracing::{debug, warn};

pub struct SignalEngine;

impl SignalEngine {
    /// Short/long SMA over the most recent closes.
    ///
    /// `None` when the series holds fewer than `long_window` bars, or when the
    /// averages are not finite; such symbols are left out of the ranking for
    /// this run.
    pub fn evaluate(
        series: &PriceSeries,
        short_window: usize,
        long_window: usize,
    ) -> Option<TrendSignal> {
        let closes = series.closes();
        if closes.len() < long_window {
            debug!(
                symbol = %series.symbol,
                bars = closes.len(),
                required = long_window,
                "SignalEngine: insufficient history for {}",
                series.symbol
            );
            return None;
        }

        let short_sma = calculate_sma(&closes, short_window)?;
        let long_sma = calculate_sma(&closes, long_window)?;
        let latest_close = series.latest_close()?;

        let signal = TrendSignal::new(
            series.symbol.clone(),
            short_sma,
            long_sma,
            latest_close,
        );
        if !signal.trend_score.is_finite() || !latest_close.is_finite() {
            warn!(
                symbol = %series.symbol,
                short_sma,
                long_sma,
                latest_close,
                "SignalEngine: non-finite prices for {}",
                series.symbol
            );
            return None;
        }
        Some(signal)
    }

    /// Order by trend score, best first.
    ///
    /// Input order is the watchlist order; the sort is stable so equal scores
    /// keep it, which makes repeated runs deterministic.
    pub fn rank(mut signals: Vec<TrendSignal>) -> Vec<TrendSignal> {
        signals.sort_by(|a, b| b.trend_score.total_cmp(&a.trend_score));
        signals
    }
}

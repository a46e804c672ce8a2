use serde::{Deserialize, Serialize};

/// Per-symbol trend reading for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub symbol: String,
    pub short_sma: f64,
    pub long_sma: f64,
    /// `short_sma - long_sma`; positive is bullish
    pub trend_score: f64,
    pub latest_close: f64,
}

impl TrendSignal {
    pub fn new(
        symbol: impl Into<String>,
        short_sma: f64,
        long_sma: f64,
        latest_close: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            short_sma,
            long_sma,
            trend_score: short_sma - long_sma,
            latest_close,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.trend_score > 0.0
    }

    /// Short average strictly below the long one
    pub fn is_bearish(&self) -> bool {
        self.short_sma < self.long_sma
    }
}

//! Credential probe, independent of any trading logic

use chrono::{Duration, Utc};
use std::fmt;
use tracing::{error, info};

use crate::error::ApiError;
use crate::models::Account;
use crate::services::alpaca::{AlpacaRestClient, BarsQuery};

/// Closes returned by the data probe
pub const PROBE_BARS: usize = 5;

pub struct DiagnosticsReport {
    pub trading: Result<Account, ApiError>,
    pub market_data: Result<Vec<f64>, ApiError>,
}

impl DiagnosticsReport {
    pub fn is_ok(&self) -> bool {
        self.trading.is_ok() && self.market_data.is_ok()
    }
}

impl fmt::Display for DiagnosticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Testing trading auth...")?;
        match &self.trading {
            Ok(acct) => writeln!(
                f,
                "OK trading auth. account_id={} status={} equity={:.2}",
                acct.id, acct.status, acct.equity
            )?,
            Err(e) => writeln!(f, "FAILED trading auth. {}", e)?,
        }

        writeln!(f, "\nTesting market data auth (daily bars)...")?;
        match &self.market_data {
            Ok(closes) => writeln!(
                f,
                "OK data auth. received {} bars. closes={:?}",
                closes.len(),
                closes
            )?,
            Err(e) => writeln!(f, "FAILED data auth. {}", e)?,
        }
        Ok(())
    }
}

/// Probe trading auth (account) then data auth (recent daily bars for `symbol`)
pub async fn run_diagnostics(client: &AlpacaRestClient, symbol: &str) -> DiagnosticsReport {
    let trading = client.get_account().await.map(Account::from);
    match &trading {
        Ok(acct) => info!(
            account_id = %acct.id,
            status = %acct.status,
            "diagnostics: trading auth ok"
        ),
        Err(e) => error!(error = %e, "diagnostics: trading auth failed"),
    }

    // Two weeks of calendar days always covers the last few sessions.
    let end = Utc::now();
    let query = BarsQuery {
        start: Some(end - Duration::days(14)),
        end: Some(end),
        limit: None,
    };
    let market_data = client.get_daily_bars(symbol, &query).await.map(|bars| {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        closes[closes.len().saturating_sub(PROBE_BARS)..].to_vec()
    });
    match &market_data {
        Ok(closes) => info!(
            symbol = %symbol,
            feed = %client.data_feed(),
            bars = closes.len(),
            "diagnostics: data auth ok"
        ),
        Err(e) => error!(symbol = %symbol, error = %e, "diagnostics: data auth failed"),
    }

    DiagnosticsReport { trading, market_data }
}

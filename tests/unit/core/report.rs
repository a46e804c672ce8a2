//! Unit tests for run report rendering

use chrono::NaiveDate;
use trendbot::core::{Decision, DecisionRecord, MarketStatus, OrderOutcome, RunReport, SkipReason};
use trendbot::ledger::CooldownLedger;
use trendbot::models::{Account, TrendSignal};

fn report() -> RunReport {
    let mut ledger = CooldownLedger::new();
    ledger.record_buy("PFE", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

    RunReport {
        mode: "PAPER",
        account: Account {
            id: "acct-1".to_string(),
            status: "ACTIVE".to_string(),
            cash: 5_000.0,
            equity: 12_000.0,
        },
        cash_start: 10_000.0,
        ranking: vec![
            TrendSignal::new("PFE", 30.0, 28.0, 31.0),
            TrendSignal::new("ZZZ", 5.0, 6.0, 5.0),
        ],
        data_issues: Vec::new(),
        market: MarketStatus::Open,
        decisions: vec![
            DecisionRecord {
                decision: Decision::Buy {
                    symbol: "PFE".to_string(),
                    qty: 50,
                    clamped: false,
                    est_cost: 1_550.0,
                },
                outcome: Some(OrderOutcome::Submitted {
                    order_id: "o-1".to_string(),
                }),
            },
            DecisionRecord {
                decision: Decision::Skip {
                    symbol: Some("T".to_string()),
                    reason: SkipReason::Cooldown {
                        days_since: 2,
                        wait_days: 5,
                    },
                },
                outcome: None,
            },
        ],
        est_cash: 3_450.0,
        ledger: Some(ledger),
        ledger_error: None,
        dry_run: false,
    }
}

#[test]
fn test_text_summary() {
    let text = report().to_string();
    assert!(text.contains("Using PAPER account | ID: acct-1"));
    assert!(text.contains("P/L vs start: $2000.00"));
    assert!(text.contains("- PFE (Pfizer Inc., Healthcare): trend=2.0000"));
    assert!(text.contains("- ZZZ (Unknown, Unknown)"));
    assert!(text.contains("buy PFE qty=50 est_cost=1550.00 [order o-1]"));
    assert!(text.contains("no buy T: waited=2 (need 5)"));
    assert!(text.contains("last_trade_day = {PFE=2024-03-15}"));
}

#[test]
fn test_json_summary() {
    let value = serde_json::to_value(report()).unwrap();
    assert_eq!(value["decisions"][0]["decision"]["action"], "buy");
    assert_eq!(value["decisions"][0]["outcome"]["outcome"], "submitted");
    assert_eq!(value["decisions"][1]["decision"]["reason"], "cooldown");
    assert_eq!(value["market"]["status"], "open");
    assert_eq!(value["ledger"]["last_trade_day"]["PFE"], "2024-03-15");
}

#[test]
fn test_report_filters() {
    let report = report();
    assert_eq!(report.buys().count(), 1);
    assert_eq!(report.sells().count(), 0);
    assert_eq!(report.submitted().count(), 1);
}

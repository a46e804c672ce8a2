//! Unit tests for Alpaca wire types and error classification

use trendbot::error::ApiError;
use trendbot::models::{Account, Bar, MarketClock, OrderSide, Position};
use trendbot::services::alpaca::client::classify_error;
use trendbot::services::alpaca::messages::{
    AccountResponse, BarsResponse, ClockResponse, OrderBody, PositionResponse,
};

#[test]
fn test_account_accepts_string_numbers() {
    let raw = r#"{
        "id": "acct-1",
        "status": "ACTIVE",
        "cash": "10250.55",
        "equity": 12000.5,
        "currency": "USD"
    }"#;
    let account: Account = serde_json::from_str::<AccountResponse>(raw).unwrap().into();

    assert_eq!(account.id, "acct-1");
    assert_eq!(account.status, "ACTIVE");
    assert_eq!(account.cash, 10250.55);
    assert_eq!(account.equity, 12000.5);
}

#[test]
fn test_position_truncates_fractional_qty() {
    let raw = r#"[
        {"symbol": "PFE", "qty": "12.75", "side": "long"},
        {"symbol": "T", "qty": "-3", "side": "short"}
    ]"#;
    let positions: Vec<Position> = serde_json::from_str::<Vec<PositionResponse>>(raw)
        .unwrap()
        .into_iter()
        .map(Position::from)
        .collect();

    assert_eq!(positions, vec![Position::new("PFE", 12), Position::new("T", -3)]);
    assert_eq!(positions[0].long_qty(), 12);
    assert_eq!(positions[1].long_qty(), 0);
}

#[test]
fn test_clock_with_offset() {
    let raw = r#"{
        "timestamp": "2024-03-16T10:00:00-04:00",
        "is_open": false,
        "next_open": "2024-03-18T09:30:00-04:00"
    }"#;
    let clock: MarketClock = serde_json::from_str::<ClockResponse>(raw).unwrap().into();

    assert!(!clock.is_open);
    assert_eq!(clock.next_open.unwrap().to_rfc3339(), "2024-03-18T13:30:00+00:00");
}

#[test]
fn test_bars_null_and_paged() {
    let empty: BarsResponse =
        serde_json::from_str(r#"{"bars": null, "symbol": "PFE", "next_page_token": null}"#)
            .unwrap();
    assert!(empty.bars.is_none());
    assert!(empty.next_page_token.is_none());

    let raw = r#"{
        "bars": [
            {"t": "2024-03-14T04:00:00Z", "o": 28.1, "h": 28.6, "l": 27.9, "c": 28.4,
             "v": 31000000, "n": 1, "vw": 28.3}
        ],
        "next_page_token": "abc"
    }"#;
    let page: BarsResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(page.next_page_token.as_deref(), Some("abc"));

    let bars: Vec<Bar> = page.bars.unwrap().into_iter().map(Bar::from).collect();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].close, 28.4);
    assert_eq!(bars[0].volume, 31_000_000.0);
}

#[test]
fn test_order_body_shape() {
    let body = OrderBody {
        symbol: "PFE",
        qty: "50".to_string(),
        side: OrderSide::Buy,
        order_type: "market",
        time_in_force: "day",
    };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "symbol": "PFE",
            "qty": "50",
            "side": "buy",
            "type": "market",
            "time_in_force": "day"
        })
    );
}

#[test]
fn test_classify_unauthorized() {
    let err = classify_error(401, "request is not authorized", "Alpaca trading API");
    assert!(matches!(err, ApiError::Unauthorized { status: 401, .. }));
    assert!(err.to_string().contains("Trading API keys"));

    let err = classify_error(403, "forbidden.", "Alpaca trading API");
    assert!(matches!(err, ApiError::Unauthorized { status: 403, .. }));
}

#[test]
fn test_classify_sip_entitlement() {
    let err = classify_error(
        403,
        "subscription does not permit querying recent SIP data",
        "Alpaca market data",
    );
    assert!(matches!(err, ApiError::SipNotPermitted));
    assert!(err.to_string().contains("ALPACA_DATA_FEED=iex"));
    assert!(!err.is_transient());
}

#[test]
fn test_classify_other_statuses() {
    assert!(matches!(classify_error(404, "not found", "x"), ApiError::NotFound(_)));

    let limited = classify_error(429, "too many requests", "x");
    assert!(matches!(limited, ApiError::RateLimited(_)));
    assert!(limited.is_transient());

    let server = classify_error(503, "unavailable", "x");
    assert!(matches!(server, ApiError::Status { status: 503, .. }));
    assert!(server.is_transient());

    let rejected = classify_error(422, "qty must be > 0", "x");
    assert!(matches!(rejected, ApiError::Status { status: 422, .. }));
    assert!(!rejected.is_transient());
    assert!(rejected.to_string().contains("qty must be > 0"));
}

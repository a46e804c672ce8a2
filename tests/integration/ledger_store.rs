//! Cooldown store persistence and run lock behaviour on a real filesystem

use chrono::NaiveDate;
use std::fs;

use trendbot::error::LedgerError;
use trendbot::ledger::{lock_path_for, CooldownLedger, LedgerStore, RunLock};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn test_missing_store_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("state.json"));

    let ledger = store.load().unwrap();
    assert!(ledger.is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_flush_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("state.json"));

    let mut ledger = CooldownLedger::new();
    ledger.record_buy("T", day(1));
    ledger.record_buy("PFE", day(15));
    store.flush(&ledger).unwrap();

    assert_eq!(store.load().unwrap(), ledger);
    // No temp file left behind
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_flush_format() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("state.json"));

    let mut ledger = CooldownLedger::new();
    ledger.record_buy("T", day(1));
    ledger.record_buy("PFE", day(15));
    store.flush(&ledger).unwrap();

    let written = fs::read_to_string(store.path()).unwrap();
    let expected = concat!(
        "{\n",
        "  \"last_trade_day\": {\n",
        "    \"PFE\": \"2024-03-15\",\n",
        "    \"T\": \"2024-03-01\"\n",
        "  }\n",
        "}\n",
    );
    assert_eq!(written, expected);
}

#[test]
fn test_flush_replaces_whole_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("state.json"));
    fs::write(store.path(), r#"{"last_trade_day":{"OLD":"2020-01-01"},"extra":true}"#).unwrap();

    let mut ledger = store.load().unwrap();
    assert_eq!(ledger.last_buy("OLD"), Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
    ledger.record_buy("NEW", day(15));
    store.flush(&ledger).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.len(), 2);
    assert!(!fs::read_to_string(store.path()).unwrap().contains("extra"));
}

#[test]
fn test_corrupt_store_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("state.json"));
    fs::write(store.path(), "not json").unwrap();

    assert!(matches!(store.load(), Err(LedgerError::Parse { .. })));

    fs::write(store.path(), r#"{"last_trade_day":{"PFE":"yesterday"}}"#).unwrap();
    assert!(matches!(store.load(), Err(LedgerError::Parse { .. })));
}

#[test]
fn test_flush_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerStore::new(dir.path().join("missing").join("state.json"));

    let err = store.flush(&CooldownLedger::new()).unwrap_err();
    assert!(matches!(err, LedgerError::Io { .. }));
}

#[test]
fn test_lock_is_exclusive_and_released_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = lock_path_for(&dir.path().join("state.json"));
    assert!(path.to_string_lossy().ends_with("state.json.lock"));

    let lock = RunLock::acquire(&path).unwrap();
    assert_eq!(lock.path(), path.as_path());
    let err = RunLock::acquire(&path).unwrap_err();
    assert!(matches!(err, LedgerError::Locked { .. }));
    assert!(err.to_string().contains("another run holds the lock"));

    drop(lock);
    let _again = RunLock::acquire(&path).unwrap();
}

#[test]
fn test_leftover_lock_file_is_reclaimed() {
    let dir = tempfile::tempdir().unwrap();
    let path = lock_path_for(&dir.path().join("state.json"));
    fs::write(&path, "99999999\n").unwrap();

    let lock = RunLock::acquire(&path).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("{}\n", std::process::id())
    );

    // Still exclusive while held
    assert!(matches!(
        RunLock::acquire(&path),
        Err(LedgerError::Locked { .. })
    ));
    drop(lock);
}

#[test]
fn test_lock_in_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = lock_path_for(&dir.path().join("missing").join("state.json"));

    assert!(matches!(RunLock::acquire(&path), Err(LedgerError::Io { .. })));
}

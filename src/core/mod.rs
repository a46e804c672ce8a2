//! Core application primitives (decision engine, run orchestration)

pub mod context;
pub mod decision;
pub mod report;
pub mod runner;

pub use context::RunContext;
pub use decision::DecisionEngine;
pub use report::{
    DataIssue, Decision, DecisionRecord, MarketStatus, OrderOutcome, RunReport, SkipReason,
};
pub use runner::TradingRun;

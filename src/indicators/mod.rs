//! Technical indicators computed over daily closes

pub mod trend;

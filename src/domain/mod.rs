//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod time_point;
pub mod features;
pub mod signal;
pub mod trade;
pub mod portfolio;
pub mod simulator;
pub mod backtest;
pub mod metrics;
pub mod validation;
pub mod config_validation;
pub mod error;

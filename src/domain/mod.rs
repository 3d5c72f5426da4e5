//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod macd;
pub mod price_series;
pub mod simulator;
pub mod sma;
pub mod strategy;

//! Domain error types.

use crate::domain::strategy::StrategyKind;

/// Top-level error type for tradesim.
#[derive(Debug, thiserror::Error)]
pub enum TradeSimError {
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("day {day} exceeds available data size {size}")]
    DayOutOfRange { day: usize, size: usize },

    #[error("{strategy} indicator requested for day {day}, earlier than long-term period {long_term}")]
    DayBeforeWindow {
        strategy: StrategyKind,
        day: usize,
        long_term: usize,
    },

    #[error("invalid number of stocks: {stocks}")]
    InvalidStockCount { stocks: i64 },

    #[error("price series is empty")]
    EmptySeries,

    #[error("price at index {index} is not a finite number")]
    NonFinitePrice { index: usize },

    #[error("failed to read {path}: {reason}")]
    DataFile { path: String, reason: String },

    #[error("potentially corrupt data on line {line}: '{value}'")]
    CorruptData { line: u64, value: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradeSimError> for std::process::ExitCode {
    fn from(err: &TradeSimError) -> Self {
        let code: u8 = match err {
            TradeSimError::Io(_)
            | TradeSimError::DayOutOfRange { .. }
            | TradeSimError::DayBeforeWindow { .. } => 1,
            TradeSimError::InvalidParameter { .. }
            | TradeSimError::InvalidStockCount { .. }
            | TradeSimError::ConfigParse { .. }
            | TradeSimError::ConfigInvalid { .. } => 2,
            TradeSimError::EmptySeries
            | TradeSimError::NonFinitePrice { .. }
            | TradeSimError::DataFile { .. }
            | TradeSimError::CorruptData { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}

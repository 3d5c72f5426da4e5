//! Shared indicator strategy contract.
//!
//! Every strategy borrows the price series and a validated pair of
//! `(short_term, long_term)` periods. Validation happens once at
//! construction; the parameters are immutable afterwards.

use std::fmt;

use crate::domain::error::TradeSimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Sma,
    Macd,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Sma => write!(f, "SMA"),
            StrategyKind::Macd => write!(f, "MACD"),
        }
    }
}

/// Buy/sell decision capability shared by SMA and MACD.
///
/// `indicator(None)` queries the latest day, i.e. the day after the last
/// close in the series.
pub trait Strategy {
    fn kind(&self) -> StrategyKind;
    fn short_term(&self) -> usize;
    fn long_term(&self) -> usize;
    fn indicator(&self, day: Option<usize>) -> Result<bool, TradeSimError>;
}

/// Validated periods plus the borrowed series they apply to.
#[derive(Debug, Clone, Copy)]
pub struct StrategyParams<'a> {
    prices: &'a [f64],
    short_term: usize,
    long_term: usize,
}

impl<'a> StrategyParams<'a> {
    pub fn new(prices: &'a [f64], short_term: usize, long_term: usize) -> Result<Self, TradeSimError> {
        if short_term == 0 || long_term == 0 {
            return Err(TradeSimError::InvalidParameter {
                reason: "long-term and short-term periods must be positive".into(),
            });
        }
        if long_term <= short_term {
            return Err(TradeSimError::InvalidParameter {
                reason: "long-term period must be larger than short-term period".into(),
            });
        }
        if long_term > prices.len() {
            return Err(TradeSimError::InvalidParameter {
                reason: format!(
                    "long-term period {} cannot be larger than data size {}",
                    long_term,
                    prices.len()
                ),
            });
        }
        Ok(Self {
            prices,
            short_term,
            long_term,
        })
    }

    pub fn prices(&self) -> &'a [f64] {
        self.prices
    }

    pub fn short_term(&self) -> usize {
        self.short_term
    }

    pub fn long_term(&self) -> usize {
        self.long_term
    }

    pub fn size(&self) -> usize {
        self.prices.len()
    }

    /// Resolves `None` to the latest day and checks `long_term <= day <= size`.
    pub fn resolve_day(&self, kind: StrategyKind, day: Option<usize>) -> Result<usize, TradeSimError> {
        let size = self.size();
        let day = day.unwrap_or(size);
        if day > size {
            return Err(TradeSimError::DayOutOfRange { day, size });
        }
        if day < self.long_term {
            return Err(TradeSimError::DayBeforeWindow {
                strategy: kind,
                day,
                long_term: self.long_term,
            });
        }
        Ok(day)
    }
}

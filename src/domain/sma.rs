//! Simple Moving Average crossover strategy.
//!
//! Signal for `day` compares the trailing short and long window means over
//! `price[day - n .. day]`. The close of `day` itself is excluded, so the
//! signal is available before that day's market open. A tie is a sell.

use crate::domain::error::TradeSimError;
use crate::domain::strategy::{Strategy, StrategyKind, StrategyParams};

pub const DEFAULT_SHORT: usize = 50;
pub const DEFAULT_LONG: usize = 200;

#[derive(Debug, Clone)]
pub struct Sma<'a> {
    params: StrategyParams<'a>,
}

impl<'a> Sma<'a> {
    pub fn new(prices: &'a [f64], short_term: usize, long_term: usize) -> Result<Self, TradeSimError> {
        Ok(Self {
            params: StrategyParams::new(prices, short_term, long_term)?,
        })
    }

    pub fn prices(&self) -> &'a [f64] {
        self.params.prices()
    }

    fn window_mean(&self, day: usize, period: usize) -> f64 {
        let window = &self.params.prices()[day - period..day];
        window.iter().sum::<f64>() / period as f64
    }
}

impl Strategy for Sma<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sma
    }

    fn short_term(&self) -> usize {
        self.params.short_term()
    }

    fn long_term(&self) -> usize {
        self.params.long_term()
    }

    fn indicator(&self, day: Option<usize>) -> Result<bool, TradeSimError> {
        let day = self.params.resolve_day(self.kind(), day)?;
        let short_avg = self.window_mean(day, self.params.short_term());
        let long_avg = self.window_mean(day, self.params.long_term());
        Ok(short_avg > long_avg)
    }
}

//! MACD strategy: difference of a short and a long EMA, no signal line.
//!
//! Both EMAs are precomputed at construction. Each is seeded with the mean of
//! the first `n` closes, then `EMA[t] = C[t]*k + EMA[t-1]*(1-k)`, `k = 2/(n+1)`.
//! `short_ema[i]` belongs to day `i + short_term`, `long_ema[i]` to day
//! `i + long_term`, which makes `indicator` a constant-time lookup.

use crate::domain::error::TradeSimError;
use crate::domain::strategy::{Strategy, StrategyKind, StrategyParams};

pub const DEFAULT_SHORT: usize = 12;
pub const DEFAULT_LONG: usize = 26;

#[derive(Debug, Clone, PartialEq)]
struct EmaSeries {
    period: usize,
    seed: f64,
    values: Vec<f64>,
}

impl EmaSeries {
    fn compute(prices: &[f64], period: usize) -> Self {
        let seed = prices[..period].iter().sum::<f64>() / period as f64;
        let k = 2.0 / (period as f64 + 1.0);

        let mut ema = seed;
        let values = prices[period..]
            .iter()
            .map(|&close| {
                ema = close * k + ema * (1.0 - k);
                ema
            })
            .collect();

        Self {
            period,
            seed,
            values,
        }
    }

    /// EMA for an already validated day. The day after the last close has no
    /// entry of its own and reads the most recent value.
    fn at(&self, day: usize) -> f64 {
        match self.values.get(day - self.period) {
            Some(&v) => v,
            None => self.values.last().copied().unwrap_or(self.seed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Macd<'a> {
    params: StrategyParams<'a>,
    short_ema: EmaSeries,
    long_ema: EmaSeries,
}

impl<'a> Macd<'a> {
    pub fn new(prices: &'a [f64], short_term: usize, long_term: usize) -> Result<Self, TradeSimError> {
        let params = StrategyParams::new(prices, short_term, long_term)?;
        let short_ema = EmaSeries::compute(prices, short_term);
        let long_ema = EmaSeries::compute(prices, long_term);

        tracing::debug!(
            short_term,
            long_term,
            short_len = short_ema.values.len(),
            long_len = long_ema.values.len(),
            "precomputed MACD EMA series"
        );

        Ok(Self {
            params,
            short_ema,
            long_ema,
        })
    }

    pub fn prices(&self) -> &'a [f64] {
        self.params.prices()
    }

    pub fn short_ema(&self) -> &[f64] {
        &self.short_ema.values
    }

    pub fn long_ema(&self) -> &[f64] {
        &self.long_ema.values
    }

    /// Short EMA minus long EMA for `day`.
    pub fn line(&self, day: Option<usize>) -> Result<f64, TradeSimError> {
        let day = self.params.resolve_day(self.kind(), day)?;
        Ok(self.short_ema.at(day) - self.long_ema.at(day))
    }
}

impl Strategy for Macd<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Macd
    }

    fn short_term(&self) -> usize {
        self.params.short_term()
    }

    fn long_term(&self) -> usize {
        self.params.long_term()
    }

    fn indicator(&self, day: Option<usize>) -> Result<bool, TradeSimError> {
        Ok(self.line(day)? > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SPIKE: [f64; 5] = [1.0, 1.0, 1.0, 100.0, 1.0];

    #[test]
    fn default_parameters() {
        let data = vec![10.0; 30];
        let macd = Macd::new(&data, DEFAULT_SHORT, DEFAULT_LONG).unwrap();
        assert_eq!(macd.short_term(), 12);
        assert_eq!(macd.long_term(), 26);
    }

    #[test]
    fn indicator_rejects_invalid_days() {
        let macd = Macd::new(&SPIKE, 1, 2).unwrap();
        assert!(matches!(
            macd.indicator(Some(1)),
            Err(TradeSimError::DayBeforeWindow { .. })
        ));
        assert!(matches!(
            macd.indicator(Some(6)),
            Err(TradeSimError::DayOutOfRange { .. })
        ));
    }

    #[test]
    fn indicator_follows_spike() {
        let macd = Macd::new(&SPIKE, 2, 3).unwrap();
        assert!(macd.indicator(Some(3)).unwrap());
        assert!(!macd.indicator(Some(4)).unwrap());
    }

    #[test]
    fn ema_series_values() {
        let macd = Macd::new(&SPIKE, 2, 3).unwrap();
        // k = 2/3, seed 1: 1, 67, 23
        let short = macd.short_ema();
        assert_eq!(short.len(), 3);
        assert_relative_eq!(short[0], 1.0);
        assert_relative_eq!(short[1], 67.0);
        assert_relative_eq!(short[2], 23.0);
        // k = 1/2, seed 1: 50.5, 25.75
        let long = macd.long_ema();
        assert_eq!(long.len(), 2);
        assert_relative_eq!(long[0], 50.5);
        assert_relative_eq!(long[1], 25.75);
    }

    #[test]
    fn line_is_short_minus_long() {
        let macd = Macd::new(&SPIKE, 2, 3).unwrap();
        assert_relative_eq!(macd.line(Some(3)).unwrap(), 67.0 - 50.5, epsilon = 1e-9);
        assert_relative_eq!(macd.line(Some(4)).unwrap(), 23.0 - 25.75, epsilon = 1e-9);
    }

    #[test]
    fn latest_day_reads_most_recent_ema() {
        let macd = Macd::new(&SPIKE, 2, 3).unwrap();
        assert_relative_eq!(macd.line(None).unwrap(), macd.line(Some(4)).unwrap());
        assert!(!macd.indicator(None).unwrap());
    }

    #[test]
    fn latest_day_with_long_term_equal_to_size_uses_seed() {
        let data = [1.0, 2.0, 3.0];
        let macd = Macd::new(&data, 1, 3).unwrap();
        assert!(macd.long_ema().is_empty());
        // short EMA with k = 1 tracks the close: 3; long seed: 2
        assert_relative_eq!(macd.line(None).unwrap(), 1.0);
        assert!(macd.indicator(Some(3)).unwrap());
    }

    #[test]
    fn zero_difference_is_sell() {
        let data = [4.0; 8];
        let macd = Macd::new(&data, 2, 5).unwrap();
        for day in 5..=8 {
            assert!(!macd.indicator(Some(day)).unwrap());
        }
    }

    #[test]
    fn recomputation_is_deterministic() {
        let data: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let a = Macd::new(&data, 12, 26).unwrap();
        let b = Macd::new(&data, 12, 26).unwrap();
        assert_eq!(a.short_ema(), b.short_ema());
        assert_eq!(a.long_ema(), b.long_ema());
    }
}

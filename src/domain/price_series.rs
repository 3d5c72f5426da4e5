//! Daily closing price series.
//!
//! Index 0 is the earliest trading day. The series is loaded once and then
//! only ever borrowed by strategies and the simulator.

use std::ops::Deref;

use crate::domain::error::TradeSimError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Wraps closing prices, rejecting an empty series or non-finite values.
    pub fn new(closes: Vec<f64>) -> Result<Self, TradeSimError> {
        if closes.is_empty() {
            return Err(TradeSimError::EmptySeries);
        }
        if let Some(index) = closes.iter().position(|p| !p.is_finite()) {
            return Err(TradeSimError::NonFinitePrice { index });
        }
        Ok(Self { closes })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.closes
    }

    /// Most recent close in the series.
    pub fn latest_close(&self) -> f64 {
        self.closes[self.closes.len() - 1]
    }
}

impl Deref for PriceSeries {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.closes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_series() {
        assert!(matches!(
            PriceSeries::new(vec![]),
            Err(TradeSimError::EmptySeries)
        ));
    }

    #[test]
    fn rejects_non_finite_prices() {
        let err = PriceSeries::new(vec![1.0, f64::NAN, 3.0]).unwrap_err();
        assert!(matches!(err, TradeSimError::NonFinitePrice { index: 1 }));

        let err = PriceSeries::new(vec![f64::INFINITY]).unwrap_err();
        assert!(matches!(err, TradeSimError::NonFinitePrice { index: 0 }));
    }

    #[test]
    fn latest_close_is_last_element() {
        let series = PriceSeries::new(vec![10.0, 20.0, 30.0]).unwrap();
        assert_eq!(series[0], 10.0);
        assert_eq!(series.latest_close(), 30.0);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn single_price_is_valid() {
        let series = PriceSeries::new(vec![42.0]).unwrap();
        assert_eq!(series[0], series.latest_close());
    }

    #[test]
    fn negative_prices_are_accepted() {
        let series = PriceSeries::new(vec![-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(series.as_slice(), &[-1.0, 0.0, 1.0]);
    }
}

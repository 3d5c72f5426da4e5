//! Price data access port trait.

use crate::domain::error::TradeSimError;
use crate::domain::price_series::PriceSeries;

pub trait PricePort {
    /// Loads the full closing price series, earliest day first.
    fn load_prices(&self) -> Result<PriceSeries, TradeSimError>;
}

//! Report output port trait.

use crate::domain::error::TradeSimError;
use crate::domain::simulator::{BacktestReport, IndicatorReport};

/// Run context printed ahead of the results.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticker: String,
    pub current_price: f64,
    pub days_analysed: usize,
    pub stocks: i64,
}

/// Port for rendering simulator results.
pub trait ReportPort {
    fn header(&mut self, summary: &RunSummary) -> Result<(), TradeSimError>;

    fn indicator(&mut self, report: &IndicatorReport) -> Result<(), TradeSimError>;

    fn backtest(&mut self, report: &BacktestReport) -> Result<(), TradeSimError>;

    /// Separator between the indicator and backtest sections.
    fn section_break(&mut self) -> Result<(), TradeSimError> {
        Ok(())
    }

    fn footer(&mut self) -> Result<(), TradeSimError> {
        Ok(())
    }
}

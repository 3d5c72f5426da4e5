#![allow(dead_code)]

use tradesim::domain::error::TradeSimError;
use tradesim::domain::price_series::PriceSeries;
use tradesim::domain::simulator::{BacktestReport, IndicatorReport};
use tradesim::ports::data_port::PricePort;
use tradesim::ports::report_port::{ReportPort, RunSummary};

pub const SPIKE: [f64; 5] = [1.0, 1.0, 1.0, 100.0, 1.0];
pub const HUMP: [f64; 5] = [10.0, 20.0, 30.0, 20.0, 10.0];

pub struct MockPricePort {
    pub closes: Vec<f64>,
}

impl MockPricePort {
    pub fn new(closes: &[f64]) -> Self {
        Self {
            closes: closes.to_vec(),
        }
    }
}

impl PricePort for MockPricePort {
    fn load_prices(&self) -> Result<PriceSeries, TradeSimError> {
        PriceSeries::new(self.closes.clone())
    }
}

/// Captures everything handed to the reporter.
#[derive(Default)]
pub struct RecordingReporter {
    pub summary: Option<RunSummary>,
    pub indicator: Option<IndicatorReport>,
    pub backtest: Option<BacktestReport>,
    pub breaks: usize,
    pub footers: usize,
}

impl RecordingReporter {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.indicator.is_none()
            && self.backtest.is_none()
            && self.breaks == 0
            && self.footers == 0
    }
}

impl ReportPort for RecordingReporter {
    fn header(&mut self, summary: &RunSummary) -> Result<(), TradeSimError> {
        self.summary = Some(summary.clone());
        Ok(())
    }

    fn indicator(&mut self, report: &IndicatorReport) -> Result<(), TradeSimError> {
        self.indicator = Some(report.clone());
        Ok(())
    }

    fn backtest(&mut self, report: &BacktestReport) -> Result<(), TradeSimError> {
        self.backtest = Some(report.clone());
        Ok(())
    }

    fn section_break(&mut self) -> Result<(), TradeSimError> {
        self.breaks += 1;
        Ok(())
    }

    fn footer(&mut self) -> Result<(), TradeSimError> {
        self.footers += 1;
        Ok(())
    }
}

/// Deterministic wavy series around 100.
pub fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0 + i as f64 * 0.05)
        .collect()
}

//! Plain-text console report adapter with optional ANSI colours.

use std::io::Write;

use crate::domain::error::TradeSimError;
use crate::domain::simulator::{
    BacktestReport, BuyAndHold, IndicatorReport, ProfitOutcome, Recommendation, Signal,
    StrategyResult,
};
use crate::ports::report_port::{ReportPort, RunSummary};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const RULE: &str = "------------------------------";

pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, code: &'static str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn signal_text(&self, signal: Signal) -> String {
        match signal {
            Signal::Buy => self.paint("BUY", GREEN),
            Signal::Sell => self.paint("SELL", RED),
        }
    }

    fn recommendation_text(&self, recommendation: Recommendation) -> String {
        let text = recommendation.to_string();
        match recommendation {
            Recommendation::StrongBuy => self.paint(&text, GREEN),
            Recommendation::StrongSell => self.paint(&text, RED),
            Recommendation::Mixed => text,
        }
    }

    fn profit(&mut self, profit: f64, percent: Option<f64>) -> Result<(), TradeSimError> {
        // A negative starting price flips the percentage against the profit.
        let pct = match percent {
            Some(p) => format!("{p:+.2}%"),
            None => "n/a".to_string(),
        };
        let block = match ProfitOutcome::of(profit) {
            ProfitOutcome::Gain => Some((
                format!(" Profit: +${profit:.2}\n Percentage: {pct}"),
                GREEN,
            )),
            ProfitOutcome::Loss => Some((
                format!(" Losses: -${:.2}\n Percentage: {pct}", profit.abs()),
                RED,
            )),
            ProfitOutcome::Flat => None,
        };
        match block {
            Some((text, code)) => {
                let painted = self.paint(&text, code);
                writeln!(self.out, "{painted}")?;
            }
            None => writeln!(self.out, " Profit: ---\n Percentage: ---")?,
        }
        Ok(())
    }

    fn strategy_result(&mut self, result: &StrategyResult) -> Result<(), TradeSimError> {
        writeln!(self.out, " Strategy: {}", result.kind)?;
        writeln!(self.out, " No. of transactions: {}", result.transactions)?;
        self.profit(result.profit, result.percent)?;
        writeln!(self.out, "{RULE}")?;
        Ok(())
    }

    fn buy_and_hold(&mut self, bnh: &BuyAndHold) -> Result<(), TradeSimError> {
        writeln!(self.out, " Strategy: Buy and hold")?;
        writeln!(self.out, " Starting buy price: {:.2}", bnh.buy_price)?;
        writeln!(self.out, " Final sell price: {:.2}", bnh.sell_price)?;
        self.profit(bnh.profit, bnh.percent)
    }
}

impl<W: Write> ReportPort for ConsoleReporter<W> {
    fn header(&mut self, summary: &RunSummary) -> Result<(), TradeSimError> {
        writeln!(self.out, "** Running tests **\n")?;
        writeln!(self.out, " Stock: {}", summary.ticker)?;
        writeln!(self.out, " Current Price: {:.2}", summary.current_price)?;
        writeln!(self.out, " Days Analysed: {} days", summary.days_analysed)?;
        writeln!(self.out, " Simulating for: {} stocks\n", summary.stocks)?;
        Ok(())
    }

    fn indicator(&mut self, report: &IndicatorReport) -> Result<(), TradeSimError> {
        if report.signals.is_empty() {
            return Ok(());
        }
        writeln!(self.out, " [ Trading Signal ]\n")?;
        for s in &report.signals {
            let signal = self.signal_text(s.signal);
            writeln!(self.out, " Strategy: {} ({}/{})", s.kind, s.short_term, s.long_term)?;
            writeln!(self.out, " Signal: {signal}")?;
            writeln!(self.out, "{RULE}")?;
        }
        if let Some(recommendation) = report.recommendation {
            let text = self.recommendation_text(recommendation);
            writeln!(self.out, " Recommendation: {text}")?;
        }
        Ok(())
    }

    fn backtest(&mut self, report: &BacktestReport) -> Result<(), TradeSimError> {
        writeln!(self.out, " [ Backtest Results ]\n")?;
        for result in &report.strategies {
            self.strategy_result(result)?;
        }
        self.buy_and_hold(&report.buy_and_hold)
    }

    fn section_break(&mut self) -> Result<(), TradeSimError> {
        writeln!(self.out)?;
        Ok(())
    }

    fn footer(&mut self) -> Result<(), TradeSimError> {
        writeln!(
            self.out,
            "\nNote: transaction fees and dividends have not been factored in the calculations"
        )?;
        self.out.flush()?;
        Ok(())
    }
}

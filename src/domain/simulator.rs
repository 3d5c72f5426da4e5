//! Live signal and historical backtest over one or two strategies.
//!
//! The simulator holds at most one SMA and one MACD slot. Both modes
//! re-derive everything from the strategies and the price series on each
//! call; nothing is carried between calls.

use std::fmt;

use crate::domain::error::TradeSimError;
use crate::domain::macd::Macd;
use crate::domain::sma::Sma;
use crate::domain::strategy::{Strategy, StrategyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
}

impl From<bool> for Signal {
    fn from(bullish: bool) -> Self {
        if bullish { Signal::Buy } else { Signal::Sell }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    StrongBuy,
    StrongSell,
    Mixed,
}

impl Recommendation {
    /// Maps an aggregate score (+1 per BUY, -1 per SELL) to a recommendation.
    /// A score of exactly +1 or -1 yields none.
    pub fn from_score(score: i32) -> Option<Self> {
        if score > 1 {
            Some(Recommendation::StrongBuy)
        } else if score < -1 {
            Some(Recommendation::StrongSell)
        } else if score == 0 {
            Some(Recommendation::Mixed)
        } else {
            None
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::StrongBuy => write!(f, "STRONG BUY"),
            Recommendation::StrongSell => write!(f, "STRONG SELL"),
            Recommendation::Mixed => write!(f, "MIXED SIGNAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitOutcome {
    Gain,
    Loss,
    Flat,
}

impl ProfitOutcome {
    pub fn of(profit: f64) -> Self {
        if profit > 0.0 {
            ProfitOutcome::Gain
        } else if profit < 0.0 {
            ProfitOutcome::Loss
        } else {
            ProfitOutcome::Flat
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategySignal {
    pub kind: StrategyKind,
    pub short_term: usize,
    pub long_term: usize,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorReport {
    pub signals: Vec<StrategySignal>,
    pub recommendation: Option<Recommendation>,
}

impl IndicatorReport {
    pub fn score(&self) -> i32 {
        self.signals
            .iter()
            .map(|s| match s.signal {
                Signal::Buy => 1,
                Signal::Sell => -1,
            })
            .sum()
    }
}

/// One completed buy/sell round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub buy_day: usize,
    pub buy_price: f64,
    pub sell_day: usize,
    pub sell_price: f64,
    /// Closed by the end of the series rather than by a sell signal.
    pub forced: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResult {
    pub kind: StrategyKind,
    pub short_term: usize,
    pub long_term: usize,
    pub transactions: usize,
    pub profit: f64,
    /// `None` when no position was ever opened.
    pub percent: Option<f64>,
    pub trades: Vec<Trade>,
}

impl StrategyResult {
    pub fn outcome(&self) -> ProfitOutcome {
        ProfitOutcome::of(self.profit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuyAndHold {
    pub buy_price: f64,
    pub sell_price: f64,
    pub profit: f64,
    /// `None` when the starting price is zero.
    pub percent: Option<f64>,
}

impl BuyAndHold {
    pub fn outcome(&self) -> ProfitOutcome {
        ProfitOutcome::of(self.profit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub stocks: i64,
    pub strategies: Vec<StrategyResult>,
    pub buy_and_hold: BuyAndHold,
}

/// `(profit / stocks) / base * 100`, undefined for a zero base.
fn percent_return(profit: f64, stocks: i64, base: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some(profit / stocks as f64 / base * 100.0)
}

#[derive(Debug, Clone)]
pub struct Simulator<'a> {
    sma: Option<&'a Sma<'a>>,
    macd: Option<&'a Macd<'a>>,
    prices: &'a [f64],
    start_day: usize,
}

impl<'a> Simulator<'a> {
    pub fn with_sma(sma: &'a Sma<'a>) -> Self {
        Self {
            sma: Some(sma),
            macd: None,
            prices: sma.prices(),
            start_day: sma.long_term(),
        }
    }

    pub fn with_macd(macd: &'a Macd<'a>) -> Self {
        Self {
            sma: None,
            macd: Some(macd),
            prices: macd.prices(),
            start_day: macd.long_term(),
        }
    }

    /// Both strategies must be built on the same price series.
    pub fn with_both(sma: &'a Sma<'a>, macd: &'a Macd<'a>) -> Self {
        debug_assert!(
            std::ptr::eq(sma.prices(), macd.prices()),
            "SMA and MACD built on different price series"
        );
        Self {
            sma: Some(sma),
            macd: Some(macd),
            prices: sma.prices(),
            start_day: sma.long_term().max(macd.long_term()),
        }
    }

    /// First day on which every configured strategy has data.
    pub fn start_day(&self) -> usize {
        self.start_day
    }

    pub fn size(&self) -> usize {
        self.prices.len()
    }

    fn strategies(&self) -> impl Iterator<Item = &'a dyn Strategy> {
        let sma = self.sma.map(|s| s as &'a dyn Strategy);
        let macd = self.macd.map(|m| m as &'a dyn Strategy);
        sma.into_iter().chain(macd)
    }

    /// Signal of every configured strategy for the latest day, plus the
    /// aggregate recommendation.
    pub fn indicator(&self) -> Result<IndicatorReport, TradeSimError> {
        let signals = self
            .strategies()
            .map(|strategy| -> Result<StrategySignal, TradeSimError> {
                Ok(StrategySignal {
                    kind: strategy.kind(),
                    short_term: strategy.short_term(),
                    long_term: strategy.long_term(),
                    signal: Signal::from(strategy.indicator(None)?),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = IndicatorReport {
            signals,
            recommendation: None,
        };
        if !report.signals.is_empty() {
            report.recommendation = Recommendation::from_score(report.score());
        }
        Ok(report)
    }

    /// Walks `start_day..size` for each strategy, then adds the buy-and-hold
    /// baseline over the whole series.
    pub fn backtest(&self, stocks: i64) -> Result<BacktestReport, TradeSimError> {
        if stocks <= 0 {
            return Err(TradeSimError::InvalidStockCount { stocks });
        }

        let strategies = self
            .strategies()
            .map(|strategy| self.backtest_strategy(strategy, stocks))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BacktestReport {
            stocks,
            strategies,
            buy_and_hold: self.buy_and_hold(stocks),
        })
    }

    fn backtest_strategy(&self, strategy: &dyn Strategy, stocks: i64) -> Result<StrategyResult, TradeSimError> {
        let size = self.size();
        let mut transactions = 0usize;
        let mut profit = 0.0;
        let mut open: Option<(usize, f64)> = None;
        let mut initial_buy: Option<f64> = None;
        let mut trades = Vec::new();

        for day in self.start_day..size {
            let decision = strategy.indicator(Some(day))?;

            if decision && open.is_none() {
                let buy_price = self.prices[day];
                transactions += 1;
                open = Some((day, buy_price));
                initial_buy.get_or_insert(buy_price);
                tracing::debug!(strategy = %strategy.kind(), day, price = buy_price, "buy");
            }

            let last_day = day == size - 1;
            if let Some((buy_day, buy_price)) = open.filter(|_| !decision || last_day) {
                let sell_price = self.prices[day];
                transactions += 1;
                profit += (sell_price - buy_price) * stocks as f64;
                open = None;
                trades.push(Trade {
                    buy_day,
                    buy_price,
                    sell_day: day,
                    sell_price,
                    forced: decision,
                });
                tracing::debug!(strategy = %strategy.kind(), day, price = sell_price, forced = decision, "sell");
            }
        }

        let percent = initial_buy.and_then(|base| percent_return(profit, stocks, base));

        tracing::info!(
            strategy = %strategy.kind(),
            transactions,
            profit,
            "backtest complete"
        );

        Ok(StrategyResult {
            kind: strategy.kind(),
            short_term: strategy.short_term(),
            long_term: strategy.long_term(),
            transactions,
            profit,
            percent,
            trades,
        })
    }

    fn buy_and_hold(&self, stocks: i64) -> BuyAndHold {
        let buy_price = self.prices[0];
        let sell_price = self.prices[self.prices.len() - 1];
        let profit = (sell_price - buy_price) * stocks as f64;
        BuyAndHold {
            buy_price,
            sell_price,
            profit,
            percent: percent_return(profit, stocks, buy_price),
        }
    }
}

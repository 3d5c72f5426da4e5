//! CLI definition and dispatch.

use clap::{Parser, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report::ConsoleReporter;
use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{read_period, validate_run_config};
use crate::domain::error::TradeSimError;
use crate::domain::macd::{self, Macd};
use crate::domain::simulator::Simulator;
use crate::domain::sma::{self, Sma};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PricePort;
use crate::ports::report_port::{ReportPort, RunSummary};

pub const DEFAULT_DATA_PATH: &str = "data/temp.csv";
pub const DEFAULT_TICKER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Display indicator signals only
    Indicator,
    /// Run historical performance simulation only
    Backtest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyChoice {
    /// Simple Moving Average crossover
    Sma,
    /// Moving Average Convergence Divergence
    Macd,
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "tradesim",
    version,
    about = "Trading signals and backtests from daily closing prices using SMA and MACD",
    after_help = "Both modes and both strategies run unless narrowed with --mode / --strategy.\n\
                  Transaction fees and dividends are not modelled."
)]
pub struct Cli {
    /// Stock ticker symbol shown in the report (1-5 characters)
    #[arg(short, long)]
    pub ticker: Option<String>,
    /// Number of stocks to simulate (integer > 0) [default: 1]
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    pub stocks: Option<i64>,
    /// Run a single mode instead of both
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,
    /// Use a single strategy instead of both
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyChoice>,
    /// Closing price file [default: data/temp.csv]
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// Optional INI run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// SMA short-term period [default: 50]
    #[arg(long)]
    pub sma_short: Option<usize>,
    /// SMA long-term period [default: 200]
    #[arg(long)]
    pub sma_long: Option<usize>,
    /// MACD short-term period [default: 12]
    #[arg(long)]
    pub macd_short: Option<usize>,
    /// MACD long-term period [default: 26]
    #[arg(long)]
    pub macd_long: Option<usize>,
    /// Disable ANSI colours
    #[arg(long)]
    pub no_color: bool,
}

/// Fully resolved run settings: CLI flag, then INI value, then default.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub ticker: String,
    pub stocks: i64,
    pub indicator_mode: bool,
    pub backtest_mode: bool,
    pub use_sma: bool,
    pub use_macd: bool,
    pub sma_periods: (usize, usize),
    pub macd_periods: (usize, usize),
    pub data_path: PathBuf,
    pub color: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match cli.config.as_deref() {
        Some(path) => match load_config(path) {
            Ok(c) => Some(c),
            Err(code) => return code,
        },
        None => None,
    };

    let options = match resolve_options(&cli, config.as_ref().map(|c| c as &dyn ConfigPort)) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Loading prices from {}", options.data_path.display());
    let port = CsvPriceAdapter::new(&options.data_path);
    let mut reporter = ConsoleReporter::new(io::stdout().lock(), options.color);

    match execute(&options, &port, &mut reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradeSimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn resolve_options(
    cli: &Cli,
    config: Option<&dyn ConfigPort>,
) -> Result<RunOptions, TradeSimError> {
    if let Some(config) = config {
        validate_run_config(config)?;
    }

    let config_string = |section: &str, key: &str| config.and_then(|c| c.get_string(section, key));
    let config_period = |section: &str, key: &str| match config {
        Some(c) => read_period(c, section, key),
        None => Ok(None),
    };

    let ticker = cli
        .ticker
        .clone()
        .or_else(|| config_string("run", "ticker"))
        .unwrap_or_else(|| DEFAULT_TICKER.to_string());
    if ticker != DEFAULT_TICKER && !(1..=5).contains(&ticker.chars().count()) {
        tracing::warn!(%ticker, "ticker symbols are usually 1-5 characters");
    }

    let stocks = cli
        .stocks
        .or_else(|| config.and_then(|c| c.get_int("run", "stocks")))
        .unwrap_or(1);

    let data_path = cli
        .data
        .clone()
        .or_else(|| config_string("run", "data").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let sma_periods = (
        cli.sma_short
            .or(config_period("sma", "short_term")?)
            .unwrap_or(sma::DEFAULT_SHORT),
        cli.sma_long
            .or(config_period("sma", "long_term")?)
            .unwrap_or(sma::DEFAULT_LONG),
    );
    let macd_periods = (
        cli.macd_short
            .or(config_period("macd", "short_term")?)
            .unwrap_or(macd::DEFAULT_SHORT),
        cli.macd_long
            .or(config_period("macd", "long_term")?)
            .unwrap_or(macd::DEFAULT_LONG),
    );

    let color = !cli.no_color && config.is_none_or(|c| c.get_bool("run", "color", true));

    Ok(RunOptions {
        ticker,
        stocks,
        indicator_mode: cli.mode != Some(Mode::Backtest),
        backtest_mode: cli.mode != Some(Mode::Indicator),
        use_sma: cli.strategy != Some(StrategyChoice::Macd),
        use_macd: cli.strategy != Some(StrategyChoice::Sma),
        sma_periods,
        macd_periods,
        data_path,
        color,
    })
}

/// Loads prices, runs the selected modes and only then writes the report, so
/// a failure produces no partial output.
pub fn execute(
    options: &RunOptions,
    port: &dyn PricePort,
    reporter: &mut dyn ReportPort,
) -> Result<(), TradeSimError> {
    let prices = port.load_prices()?;

    let sma = if options.use_sma {
        let (short, long) = options.sma_periods;
        Some(Sma::new(&prices, short, long)?)
    } else {
        None
    };
    let macd = if options.use_macd {
        let (short, long) = options.macd_periods;
        Some(Macd::new(&prices, short, long)?)
    } else {
        None
    };

    let simulator = match (&sma, &macd) {
        (Some(s), Some(m)) => Simulator::with_both(s, m),
        (Some(s), None) => Simulator::with_sma(s),
        (None, Some(m)) => Simulator::with_macd(m),
        (None, None) => {
            return Err(TradeSimError::InvalidParameter {
                reason: "no strategy selected".into(),
            });
        }
    };

    let indicator = if options.indicator_mode {
        Some(simulator.indicator()?)
    } else {
        None
    };
    let backtest = if options.backtest_mode {
        Some(simulator.backtest(options.stocks)?)
    } else {
        None
    };

    tracing::info!(
        days = prices.len(),
        start_day = simulator.start_day(),
        "simulation complete"
    );

    reporter.header(&RunSummary {
        ticker: options.ticker.clone(),
        current_price: prices.latest_close(),
        days_analysed: prices.len(),
        stocks: options.stocks,
    })?;
    if let Some(report) = &indicator {
        reporter.indicator(report)?;
    }
    reporter.section_break()?;
    if let Some(report) = &backtest {
        reporter.backtest(report)?;
    }
    reporter.footer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_run_everything() {
        let options = resolve_options(&Cli::default(), None).unwrap();
        assert_eq!(options.ticker, "---");
        assert_eq!(options.stocks, 1);
        assert!(options.indicator_mode && options.backtest_mode);
        assert!(options.use_sma && options.use_macd);
        assert_eq!(options.sma_periods, (50, 200));
        assert_eq!(options.macd_periods, (12, 26));
        assert_eq!(options.data_path, PathBuf::from("data/temp.csv"));
        assert!(options.color);
    }

    #[test]
    fn mode_and_strategy_narrow_the_run() {
        let cli = Cli::try_parse_from(["tradesim", "--mode", "backtest", "-s", "macd"]).unwrap();
        let options = resolve_options(&cli, None).unwrap();
        assert!(!options.indicator_mode);
        assert!(options.backtest_mode);
        assert!(!options.use_sma);
        assert!(options.use_macd);
    }

    #[test]
    fn repeated_mode_is_rejected() {
        let result = Cli::try_parse_from(["tradesim", "-m", "backtest", "-m", "indicator"]);
        assert!(result.is_err());
    }

    #[test]
    fn negative_stocks_parse() {
        let cli = Cli::try_parse_from(["tradesim", "--stocks", "-3"]).unwrap();
        assert_eq!(cli.stocks, Some(-3));
    }
}

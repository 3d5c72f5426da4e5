//! Configuration validation.
//!
//! Validates the optional INI run config before any data is loaded.

use crate::domain::error::TradeSimError;
use crate::ports::config_port::ConfigPort;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), TradeSimError> {
    validate_stocks(config)?;
    validate_periods(config, "sma")?;
    validate_periods(config, "macd")?;
    Ok(())
}

fn validate_stocks(config: &dyn ConfigPort) -> Result<(), TradeSimError> {
    if config.get_string("run", "stocks").is_none() {
        return Ok(());
    }
    match config.get_int("run", "stocks") {
        Some(n) if n > 0 => Ok(()),
        _ => Err(TradeSimError::ConfigInvalid {
            section: "run".to_string(),
            key: "stocks".to_string(),
            reason: "stocks must be a positive integer".to_string(),
        }),
    }
}

fn validate_periods(config: &dyn ConfigPort, section: &str) -> Result<(), TradeSimError> {
    let short = read_period(config, section, "short_term")?;
    let long = read_period(config, section, "long_term")?;

    if let (Some(short), Some(long)) = (short, long) {
        if long <= short {
            return Err(TradeSimError::ConfigInvalid {
                section: section.to_string(),
                key: "long_term".to_string(),
                reason: "long_term must be larger than short_term".to_string(),
            });
        }
    }
    Ok(())
}

/// Reads an optional period, which must be a positive integer when present.
pub fn read_period(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<usize>, TradeSimError> {
    if config.get_string(section, key).is_none() {
        return Ok(None);
    }
    match config.get_int(section, key) {
        Some(n) if n > 0 => Ok(Some(n as usize)),
        _ => Err(TradeSimError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be a positive integer", key),
        }),
    }
}

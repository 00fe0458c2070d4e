//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::DcatraderError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), DcatraderError> {
    validate_initial_capital(config)?;
    validate_dates(config)?;
    validate_data_directory(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), DcatraderError> {
    for key in [
        "rsi_period",
        "ema_fast",
        "ema_slow",
        "bollinger_period",
        "macd_fast",
        "macd_slow",
        "macd_signal",
    ] {
        // sentinel default: absent keys fall back to built-in periods
        if config.get_int("indicators", key, 1) < 1 {
            return Err(invalid("indicators", key, format!("{key} must be at least 1")));
        }
    }

    let ema_fast = config.get_int("indicators", "ema_fast", 20);
    let ema_slow = config.get_int("indicators", "ema_slow", 50);
    if ema_fast >= ema_slow {
        return Err(invalid(
            "indicators",
            "ema_fast",
            "ema_fast must be shorter than ema_slow".to_string(),
        ));
    }

    let macd_fast = config.get_int("indicators", "macd_fast", 12);
    let macd_slow = config.get_int("indicators", "macd_slow", 26);
    if macd_fast >= macd_slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be shorter than macd_slow".to_string(),
        ));
    }

    let stddev = config.get_double("indicators", "bollinger_stddev", 2.0);
    if stddev <= 0.0 {
        return Err(invalid(
            "indicators",
            "bollinger_stddev",
            "bollinger_stddev must be positive".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), DcatraderError> {
    let oversold = config.get_double("strategy", "rsi_oversold", 30.0);
    let overbought = config.get_double("strategy", "rsi_overbought", 70.0);

    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid(
            "strategy",
            "rsi_oversold",
            "rsi_oversold must be between 0 and 100".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            "strategy",
            "rsi_overbought",
            "rsi_overbought must be between 0 and 100".to_string(),
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "strategy",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought".to_string(),
        ));
    }

    for key in ["lower_band_tolerance", "upper_band_tolerance"] {
        let value = config.get_double("strategy", key, 0.02);
        if !(0.0..1.0).contains(&value) {
            return Err(invalid("strategy", key, format!("{key} must be in [0, 1)")));
        }
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: String) -> DcatraderError {
    DcatraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), DcatraderError> {
    let value = config.get_double("backtest", "initial_capital", 10_000.0);
    if value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Dates are optional; when both are present start must precede end.
fn validate_dates(config: &dyn ConfigPort) -> Result<(), DcatraderError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date".to_string(),
            ));
        }
    }
    Ok(())
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    field: &str,
) -> Result<Option<NaiveDate>, DcatraderError> {
    match config.get_string("backtest", field) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "backtest",
                    field,
                    format!("invalid {} format, expected YYYY-MM-DD", field),
                )
            }),
    }
}

/// The `--symbol` override wins over `[backtest] symbol`.
pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, DcatraderError> {
    symbol_override
        .map(|s| s.trim().to_string())
        .or_else(|| config.get_string("backtest", "symbol"))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DcatraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        })
}

fn validate_data_directory(config: &dyn ConfigPort) -> Result<(), DcatraderError> {
    match config.get_string("data", "directory") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(DcatraderError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}

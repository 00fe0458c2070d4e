//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_ledger_adapter::{signals_path, CsvLedgerAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestRun};
use crate::domain::config_validation::{
    parse_optional_date, resolve_symbol, validate_backtest_config, validate_indicator_config,
    validate_strategy_config,
};
use crate::domain::error::DcatraderError;
use crate::domain::features::build_feature_series;
use crate::domain::indicator::IndicatorParams;
use crate::domain::metrics::max_drawdown;
use crate::domain::signal::{generate_signals, Signal, SignalParams};
use crate::domain::time_point::TimePoint;
use crate::domain::trade::TradeAction;
use crate::domain::validation::validate_series;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "dcatrader", about = "Signal-driven DCA backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Typst report path (default: [report] output, then report.typ)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Trade ledger CSV path (default: [report] ledger, if set)
        #[arg(long)]
        ledger: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print every BUY/SELL signal
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything one run needs, resolved from config and CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub symbol: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub indicators: IndicatorParams,
    pub signals: SignalParams,
    pub backtest: BacktestConfig,
}

impl RunSettings {
    pub fn from_config(
        config: &dyn ConfigPort,
        symbol_override: Option<&str>,
    ) -> Result<Self, DcatraderError> {
        validate_config(config)?;
        Ok(RunSettings {
            symbol: resolve_symbol(symbol_override, config)?,
            start_date: parse_optional_date(config, "start_date")?,
            end_date: parse_optional_date(config, "end_date")?,
            indicators: build_indicator_params(config),
            signals: build_signal_params(config),
            backtest: build_backtest_config(config),
        })
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
            ledger,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, symbol.as_deref())
            } else {
                run_backtest_command(&config, symbol.as_deref(), output.as_ref(), ledger.as_ref())
            }
        }
        Command::Signals { config, symbol } => run_signals(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

fn fail(err: &DcatraderError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), DcatraderError> {
    validate_backtest_config(config)?;
    validate_indicator_config(config)?;
    validate_strategy_config(config)?;
    Ok(())
}

/// Assumes `validate_indicator_config` passed; periods are at least 1.
pub fn build_indicator_params(config: &dyn ConfigPort) -> IndicatorParams {
    let d = IndicatorParams::default();
    let period =
        |key: &str, default: usize| config.get_int("indicators", key, default as i64) as usize;
    IndicatorParams {
        rsi_period: period("rsi_period", d.rsi_period),
        ema_fast: period("ema_fast", d.ema_fast),
        ema_slow: period("ema_slow", d.ema_slow),
        bollinger_period: period("bollinger_period", d.bollinger_period),
        bollinger_stddev: config.get_double("indicators", "bollinger_stddev", d.bollinger_stddev),
        macd_fast: period("macd_fast", d.macd_fast),
        macd_slow: period("macd_slow", d.macd_slow),
        macd_signal: period("macd_signal", d.macd_signal),
    }
}

pub fn build_signal_params(config: &dyn ConfigPort) -> SignalParams {
    let d = SignalParams::default();
    SignalParams {
        rsi_oversold: config.get_double("strategy", "rsi_oversold", d.rsi_oversold),
        rsi_overbought: config.get_double("strategy", "rsi_overbought", d.rsi_overbought),
        lower_band_tolerance: config.get_double(
            "strategy",
            "lower_band_tolerance",
            d.lower_band_tolerance,
        ),
        upper_band_tolerance: config.get_double(
            "strategy",
            "upper_band_tolerance",
            d.upper_band_tolerance,
        ),
    }
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> BacktestConfig {
    let d = BacktestConfig::default();
    BacktestConfig {
        initial_capital: config.get_double("backtest", "initial_capital", d.initial_capital),
        record_final_liquidation: config.get_bool(
            "backtest",
            "record_final_liquidation",
            d.record_final_liquidation,
        ),
    }
}

pub fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, DcatraderError> {
    config
        .get_string("data", "directory")
        .map(|dir| CsvAdapter::new(PathBuf::from(dir)))
        .ok_or_else(|| DcatraderError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })
}

/// Fetch candles and turn them into a validated, fully populated feature series.
pub fn load_feature_series(
    data_port: &dyn DataPort,
    settings: &RunSettings,
) -> Result<Vec<TimePoint>, DcatraderError> {
    let bars = data_port.fetch_ohlcv(&settings.symbol, settings.start_date, settings.end_date)?;
    if bars.is_empty() {
        return Err(DcatraderError::NoData {
            symbol: settings.symbol.clone(),
        });
    }

    let minimum = settings.indicators.min_bars();
    if bars.len() < minimum {
        return Err(DcatraderError::InsufficientData {
            symbol: settings.symbol.clone(),
            bars: bars.len(),
            minimum,
        });
    }

    let series = build_feature_series(&bars, &settings.indicators);
    validate_series(&series)?;
    Ok(series)
}

/// Data port to simulation result, without touching the filesystem.
pub fn execute_backtest(
    data_port: &dyn DataPort,
    settings: &RunSettings,
) -> Result<BacktestRun, DcatraderError> {
    let series = load_feature_series(data_port, settings)?;
    run_backtest(series, &settings.signals, &settings.backtest)
}

pub fn print_summary(symbol: &str, run: &BacktestRun) {
    let r = &run.result;
    eprintln!("\n=== Backtest Results (DCA): {} ===", symbol);
    eprintln!("Initial Capital:  {:.2}", r.initial_capital);
    eprintln!("Final Capital:    {:.2}", r.final_capital);
    eprintln!("Bot Performance:  {:+.2}%", r.total_return_pct);
    eprintln!("Buy & Hold:       {:+.2}%", r.buy_hold_pct);
    eprintln!("Max Drawdown:     -{:.1}%", max_drawdown(&run.equity_curve) * 100.0);
    eprintln!("Total Trades:     {}", r.num_trades);

    if !r.trades.is_empty() {
        eprintln!("\n=== Trade Detail ===");
        for t in &r.trades {
            match t.action {
                TradeAction::Buy { spent, .. } => {
                    eprintln!("  BUY  {} @ {:.2} | spent {:.2}", t.timestamp, t.price, spent)
                }
                TradeAction::Sell { capital, .. } => {
                    eprintln!("  SELL {} @ {:.2} -> capital {:.2}", t.timestamp, t.price, capital)
                }
            }
        }
    }
}

fn run_backtest_command(
    config_path: &Path,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
    ledger_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let settings = match RunSettings::from_config(&config, symbol_override) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    // Stage 2: Data, features, signals, simulation
    let data_port = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    eprintln!(
        "Running backtest: {} with {}",
        settings.symbol, settings.indicators
    );
    let run = match execute_backtest(&data_port, &settings) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    eprintln!("  Processing: {} points", run.series.len());

    // Stage 3: Console summary
    print_summary(&settings.symbol, &run);

    // Stage 4: Reports
    let output = output_path
        .cloned()
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.typ"));
    let template = config.get_string("report", "template_path").map(PathBuf::from);
    let typst = TypstReportAdapter::new(template).with_rsi_guides(&settings.signals);
    if let Err(e) = typst.write(&run, &settings.symbol, &output.to_string_lossy()) {
        return fail(&e);
    }
    eprintln!("\nReport written to: {}", output.display());

    let ledger = ledger_path
        .cloned()
        .or_else(|| config.get_string("report", "ledger").map(PathBuf::from));
    if let Some(ledger) = ledger {
        if let Err(e) = CsvLedgerAdapter.write(&run, &settings.symbol, &ledger.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("Ledger written to: {}", ledger.display());
        eprintln!("Signals written to: {}", signals_path(&ledger).display());
    }

    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let settings = match RunSettings::from_config(&config, symbol_override) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    eprintln!("Config validated successfully");

    let fmt_date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    let data_dir = config.get_string("data", "directory").unwrap_or_default();

    eprintln!("\nRun:");
    eprintln!("  symbol:          {}", settings.symbol);
    eprintln!("  data directory:  {}", data_dir);
    eprintln!("  start date:      {}", fmt_date(settings.start_date));
    eprintln!("  end date:        {}", fmt_date(settings.end_date));
    eprintln!("  initial capital: {:.2}", settings.backtest.initial_capital);
    eprintln!(
        "  record final liquidation: {}",
        settings.backtest.record_final_liquidation
    );

    eprintln!("\nIndicators to compute:");
    eprintln!("  {}", settings.indicators);
    eprintln!("  minimum bars: {}", settings.indicators.min_bars());

    eprintln!("\nSignal thresholds:");
    eprintln!(
        "  BUY:  rsi < {} and (MACD cross up or close <= lower band x {})",
        settings.signals.rsi_oversold,
        1.0 + settings.signals.lower_band_tolerance
    );
    eprintln!(
        "  SELL: rsi > {} and (MACD cross down or close >= upper band x {})",
        settings.signals.rsi_overbought,
        1.0 - settings.signals.upper_band_tolerance
    );

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_signals(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let settings = match RunSettings::from_config(&config, symbol_override) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    let data_port = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let series = match load_feature_series(&data_port, &settings) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    let signals = generate_signals(&series, &settings.signals);

    let mut shown = 0;
    for (point, signal) in series.iter().zip(&signals) {
        if *signal != Signal::Hold {
            println!(
                "{}\t{:.2}\t{:.2}\t{}",
                point.timestamp, point.close, point.rsi, signal
            );
            shown += 1;
        }
    }
    eprintln!("{} signals in {} points", shown, series.len());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&config) {
        return fail(&e);
    }
    if let Err(e) = resolve_symbol(None, &config) {
        return fail(&e);
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    // without a symbol, report every file in the data directory
    let symbols = match resolve_symbol(symbol_override, &config) {
        Ok(s) => vec![s],
        Err(_) => match data_port.list_symbols() {
            Ok(s) => s,
            Err(e) => return fail(&e),
        },
    };

    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, first, last);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

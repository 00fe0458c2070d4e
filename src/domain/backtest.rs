//! Backtest configuration, result, and the signal-to-ledger run.

use log::info;

use super::error::DcatraderError;
use super::portfolio::EquityPoint;
use super::signal::{count_signals, generate_signals, Signal, SignalParams};
use super::simulator::simulate;
use super::time_point::TimePoint;
use super::trade::Trade;
use super::validation::validate_series;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Append the end-of-run liquidation to the ledger as a SELL trade.
    pub record_final_liquidation: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10_000.0,
            record_final_liquidation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_return_pct: f64,
    pub buy_hold_pct: f64,
    pub num_trades: usize,
    pub trades: Vec<Trade>,
}

impl BacktestResult {
    /// Strategy return minus the buy-and-hold return, in percentage points.
    pub fn excess_return_pct(&self) -> f64 {
        self.total_return_pct - self.buy_hold_pct
    }

    pub fn beats_buy_and_hold(&self) -> bool {
        self.total_return_pct > self.buy_hold_pct
    }
}

/// Output of one full run: the aligned signal series plus the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRun {
    pub series: Vec<TimePoint>,
    pub signals: Vec<Signal>,
    pub result: BacktestResult,
    pub equity_curve: Vec<EquityPoint>,
    pub capital_per_buy: f64,
}

/// Generate signals for `series` and replay them.
pub fn run_backtest(
    series: Vec<TimePoint>,
    params: &SignalParams,
    config: &BacktestConfig,
) -> Result<BacktestRun, DcatraderError> {
    validate_series(&series)?;

    let signals = generate_signals(&series, params);
    let counts = count_signals(&signals);
    info!(
        "{} points: {} BUY, {} SELL, {} HOLD",
        series.len(),
        counts.buys,
        counts.sells,
        counts.holds
    );

    let sim = simulate(&series, &signals, config)?;
    info!(
        "final capital {:.2} ({:+.2}%), buy & hold {:+.2}%, {} trades",
        sim.result.final_capital,
        sim.result.total_return_pct,
        sim.result.buy_hold_pct,
        sim.result.num_trades
    );

    Ok(BacktestRun {
        series,
        signals,
        result: sim.result,
        equity_curve: sim.equity_curve,
        capital_per_buy: sim.capital_per_buy,
    })
}

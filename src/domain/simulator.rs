//! Portfolio simulation: replays a signal series against cash and holdings.
//!
//! Implements fixed-fraction dollar-cost averaging: the initial capital is
//! split evenly across every BUY signal of the run, and every SELL liquidates
//! the whole position.

use log::{debug, trace, warn};

use super::backtest::{BacktestConfig, BacktestResult};
use super::error::DcatraderError;
use super::metrics::{buy_hold_pct, total_return_pct};
use super::portfolio::{EquityPoint, PortfolioState};
use super::signal::Signal;
use super::time_point::TimePoint;
use super::trade::{Trade, TradeAction};
use super::validation::{validate_alignment, validate_capital, validate_series};

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub result: BacktestResult,
    /// Mark-to-market equity after each step.
    pub equity_curve: Vec<EquityPoint>,
    pub capital_per_buy: f64,
}

/// Outcome of applying one signal.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Executed(Trade),
    InsufficientCash,
    NothingToSell,
    Held,
}

/// `initial_capital / N` for `N` BUY signals, or `initial_capital` when there
/// are none.
pub fn capital_per_buy(initial_capital: f64, signals: &[Signal]) -> f64 {
    let buys = signals.iter().filter(|s| **s == Signal::Buy).count();
    if buys > 0 {
        initial_capital / buys as f64
    } else {
        initial_capital
    }
}

/// Apply one signal at `point` to `state`.
///
/// - BUY spends exactly `capital_per_buy` if the cash covers it.
/// - SELL liquidates the full position if there is one.
/// - HOLD does nothing.
pub fn step(
    state: &mut PortfolioState,
    point: &TimePoint,
    signal: Signal,
    capital_per_buy: f64,
) -> StepOutcome {
    let price = point.close;
    match signal {
        Signal::Buy if state.can_afford(capital_per_buy) => {
            let quantity = state.buy(capital_per_buy, price);
            StepOutcome::Executed(Trade {
                timestamp: point.timestamp,
                price,
                action: TradeAction::Buy {
                    quantity,
                    spent: capital_per_buy,
                },
            })
        }
        Signal::Buy => StepOutcome::InsufficientCash,
        Signal::Sell if state.has_holdings() => {
            let quantity = state.liquidate(price);
            StepOutcome::Executed(Trade {
                timestamp: point.timestamp,
                price,
                action: TradeAction::Sell {
                    quantity,
                    capital: state.cash,
                },
            })
        }
        Signal::Sell => StepOutcome::NothingToSell,
        Signal::Hold => StepOutcome::Held,
    }
}

/// Replay `signals` over `series` in time order.
///
/// Steps:
/// 1. Validate capital, series and alignment (no state exists before this)
/// 2. Compute `capital_per_buy` once from the BUY count
/// 3. Apply each signal in order, appending executed trades to the ledger
/// 4. Liquidate residual holdings at the final close
/// 5. Compute return metrics
pub fn simulate(
    series: &[TimePoint],
    signals: &[Signal],
    config: &BacktestConfig,
) -> Result<Simulation, DcatraderError> {
    validate_capital(config.initial_capital)?;
    validate_series(series)?;
    validate_alignment(series, signals)?;

    let per_buy = capital_per_buy(config.initial_capital, signals);
    if !signals.contains(&Signal::Buy) {
        warn!("no BUY signals in {} points; nothing will be bought", series.len());
    }

    let mut state = PortfolioState::new(config.initial_capital);
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve = Vec::with_capacity(series.len());

    for (point, &signal) in series.iter().zip(signals) {
        match step(&mut state, point, signal, per_buy) {
            StepOutcome::Executed(trade) => {
                debug!(
                    "{} {} @ {:.4} qty {:.8} cash {:.4}",
                    trade.timestamp,
                    trade.action,
                    trade.price,
                    trade.quantity(),
                    state.cash
                );
                trades.push(trade);
            }
            StepOutcome::InsufficientCash => {
                trace!("{} BUY ignored: cash {:.4} < {:.4}", point.timestamp, state.cash, per_buy);
            }
            StepOutcome::NothingToSell => {
                trace!("{} SELL ignored: no holdings", point.timestamp);
            }
            StepOutcome::Held => {}
        }
        equity_curve.push(EquityPoint {
            timestamp: point.timestamp,
            equity: state.total_equity(point.close),
        });
    }

    // validate_series guarantees at least one point
    let first = &series[0];
    let last = &series[series.len() - 1];

    if state.has_holdings() {
        let quantity = state.liquidate(last.close);
        debug!(
            "{} final liquidation of {:.8} @ {:.4}",
            last.timestamp, quantity, last.close
        );
        if config.record_final_liquidation {
            trades.push(Trade {
                timestamp: last.timestamp,
                price: last.close,
                action: TradeAction::Sell {
                    quantity,
                    capital: state.cash,
                },
            });
        }
    }

    let final_capital = state.cash;
    let result = BacktestResult {
        initial_capital: config.initial_capital,
        final_capital,
        total_return_pct: total_return_pct(config.initial_capital, final_capital),
        buy_hold_pct: buy_hold_pct(first.close, last.close),
        num_trades: trades.len(),
        trades,
    };

    Ok(Simulation {
        result,
        equity_curve,
        capital_per_buy: per_buy,
    })
}

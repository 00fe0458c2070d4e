//! Performance metrics.
//!
//! All values are kept at full precision; use [`round_cents`] only when
//! formatting for display.

use super::portfolio::EquityPoint;

/// (final - initial) / initial * 100
pub fn total_return_pct(initial_capital: f64, final_capital: f64) -> f64 {
    (final_capital - initial_capital) / initial_capital * 100.0
}

/// Return of buying at the first close and selling at the last, in percent.
pub fn buy_hold_pct(first_close: f64, last_close: f64) -> f64 {
    (last_close - first_close) / first_close * 100.0
}

/// Largest peak-to-trough decline of the equity curve, as a fraction.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let Some(first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - point.equity) / peak);
        }
    }

    max_dd
}

/// Round to two decimals, for display.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Signal generation.
//!
//! A signal at index `i` is a pure function of the rows at `i - 1` and `i`:
//!
//! - BUY: RSI strictly below the oversold level, and either a MACD upward
//!   cross or a close within the tolerance of the lower Bollinger band.
//! - SELL: RSI strictly above the overbought level, and either a MACD
//!   downward cross or a close within the tolerance of the upper band.
//! - HOLD otherwise. The first row is always HOLD.

use std::fmt;

use crate::domain::time_point::TimePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Signal {
    #[default]
    Hold = 0,
    Buy = 1,
    Sell = -1,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        self as i8
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Hold => write!(f, "HOLD"),
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
        }
    }
}

/// Thresholds for the oscillator gate and the band proximity test.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// BUY proximity: close <= lower * (1 + tolerance)
    pub lower_band_tolerance: f64,
    /// SELL proximity: close >= upper * (1 - tolerance)
    pub upper_band_tolerance: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        SignalParams {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            lower_band_tolerance: 0.02,
            upper_band_tolerance: 0.02,
        }
    }
}

fn macd_crosses_up(previous: &TimePoint, current: &TimePoint) -> bool {
    previous.macd < previous.macd_signal && current.macd >= current.macd_signal
}

fn macd_crosses_down(previous: &TimePoint, current: &TimePoint) -> bool {
    previous.macd > previous.macd_signal && current.macd <= current.macd_signal
}

/// Step function: the signal for `current` given the row before it.
pub fn evaluate(previous: &TimePoint, current: &TimePoint, params: &SignalParams) -> Signal {
    let near_lower = current.close <= current.bollinger_lower * (1.0 + params.lower_band_tolerance);
    let near_upper = current.close >= current.bollinger_upper * (1.0 - params.upper_band_tolerance);

    if current.rsi < params.rsi_oversold && (macd_crosses_up(previous, current) || near_lower) {
        Signal::Buy
    } else if current.rsi > params.rsi_overbought
        && (macd_crosses_down(previous, current) || near_upper)
    {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Signal at `index`; HOLD at index 0 or past the end of the series.
pub fn signal_at(series: &[TimePoint], index: usize, params: &SignalParams) -> Signal {
    if index == 0 || index >= series.len() {
        return Signal::Hold;
    }
    evaluate(&series[index - 1], &series[index], params)
}

/// Full signal series, aligned index-for-index with `series`.
pub fn generate_signals(series: &[TimePoint], params: &SignalParams) -> Vec<Signal> {
    if series.is_empty() {
        return Vec::new();
    }
    std::iter::once(Signal::Hold)
        .chain(series.windows(2).map(|w| evaluate(&w[0], &w[1], params)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalCounts {
    pub buys: usize,
    pub sells: usize,
    pub holds: usize,
}

pub fn count_signals(signals: &[Signal]) -> SignalCounts {
    signals
        .iter()
        .fold(SignalCounts::default(), |mut counts, signal| {
            match signal {
                Signal::Buy => counts.buys += 1,
                Signal::Sell => counts.sells += 1,
                Signal::Hold => counts.holds += 1,
            }
            counts
        })
}

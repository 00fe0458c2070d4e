//! Technical indicators needed to build the feature series.
//!
//! Every calculator works on a slice of closing prices and returns a vector
//! aligned index-for-index with its input. Warm-up positions, where the
//! indicator is not yet defined, are `None`.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use bollinger::{calculate_bollinger, BollingerPoint};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdPoint};
pub use rsi::calculate_rsi;

use std::fmt;

/// Lookback parameters for the indicator set.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub bollinger_period: usize,
    pub bollinger_stddev: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            rsi_period: rsi::DEFAULT_PERIOD,
            ema_fast: 20,
            ema_slow: 50,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_stddev: bollinger::DEFAULT_STDDEV,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
        }
    }
}

impl IndicatorParams {
    /// Number of leading bars for which at least one indicator is undefined.
    pub fn warmup(&self) -> usize {
        let rsi = self.rsi_period;
        let ema = self.ema_fast.max(self.ema_slow).saturating_sub(1);
        let bollinger = self.bollinger_period.saturating_sub(1);
        let macd = macd::warmup(self.macd_fast, self.macd_slow, self.macd_signal);
        rsi.max(ema).max(bollinger).max(macd)
    }

    /// Minimum number of bars needed to produce one complete feature row.
    pub fn min_bars(&self) -> usize {
        self.warmup() + 1
    }
}

impl fmt::Display for IndicatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RSI({}) EMA({}) EMA({}) BOLLINGER({},{}) MACD({},{},{})",
            self.rsi_period,
            self.ema_fast,
            self.ema_slow,
            self.bollinger_period,
            self.bollinger_stddev,
            self.macd_fast,
            self.macd_slow,
            self.macd_signal
        )
    }
}

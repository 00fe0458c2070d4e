//! Bollinger Bands.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) values are undefined.

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn calculate_bollinger(closes: &[f64], period: usize, mult: f64) -> Vec<Option<BollingerPoint>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    for (i, window) in closes.windows(period).enumerate() {
        let n = period as f64;
        let middle = window.iter().sum::<f64>() / n;
        let variance = window
            .iter()
            .map(|c| {
                let diff = c - middle;
                diff * diff
            })
            .sum::<f64>()
            / n;
        let stddev = variance.sqrt();

        out[i + period - 1] = Some(BollingerPoint {
            upper: middle + mult * stddev,
            middle,
            lower: middle - mult * stddev,
        });
    }

    out
}

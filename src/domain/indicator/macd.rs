//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: max(fast, slow) - 1 + signal - 1 values.

use super::ema::calculate_ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
}

impl MacdPoint {
    pub fn histogram(&self) -> f64 {
        self.line - self.signal
    }
}

/// Number of leading values for which the signal line is undefined.
pub fn warmup(fast: usize, slow: usize, signal_period: usize) -> usize {
    fast.max(slow).saturating_sub(1) + signal_period.saturating_sub(1)
}

pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Vec<Option<MacdPoint>> {
    let mut out = vec![None; closes.len()];
    if fast == 0 || slow == 0 || signal_period == 0 {
        return out;
    }

    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let start = fast.max(slow) - 1;
    if start >= closes.len() {
        return out;
    }

    // The line is defined from `start` onwards; the signal EMA seeds there.
    let defined: Vec<f64> = line[start..].iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal = calculate_ema(&defined, signal_period);

    for (offset, sig) in signal.into_iter().enumerate() {
        if let (Some(signal), Some(line)) = (sig, line[start + offset]) {
            out[start + offset] = Some(MacdPoint { line, signal });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.2)
            .collect()
    }

    #[test]
    fn macd_warmup_default() {
        let closes = wave(40);
        let values = calculate_macd(&closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
        let first_valid = values.iter().position(Option::is_some).unwrap();
        assert_eq!(first_valid, 33);
        assert_eq!(first_valid, warmup(DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL));
        assert!(values[33..].iter().all(Option::is_some));
    }

    #[test]
    fn macd_line_is_ema_difference() {
        let closes = wave(30);
        let values = calculate_macd(&closes, 3, 5, 2);
        let fast = calculate_ema(&closes, 3);
        let slow = calculate_ema(&closes, 5);
        for i in 5..30 {
            let point = values[i].unwrap();
            let expected = fast[i].unwrap() - slow[i].unwrap();
            assert!((point.line - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn signal_seed_is_mean_of_first_lines() {
        let closes = wave(20);
        let values = calculate_macd(&closes, 2, 4, 3);
        let fast = calculate_ema(&closes, 2);
        let slow = calculate_ema(&closes, 4);
        let lines: Vec<f64> = (3..6)
            .map(|i| fast[i].unwrap() - slow[i].unwrap())
            .collect();
        let seed = lines.iter().sum::<f64>() / 3.0;
        assert!(values[4].is_none());
        assert!((values[5].unwrap().signal - seed).abs() < 1e-12);
    }

    #[test]
    fn constant_prices_give_zero_macd() {
        let values = calculate_macd(&[50.0; 40], 12, 26, 9);
        for p in values.into_iter().flatten() {
            assert!(p.line.abs() < 1e-12);
            assert!(p.signal.abs() < 1e-12);
            assert!(p.histogram().abs() < 1e-12);
        }
    }

    #[test]
    fn too_short_series_is_all_warmup() {
        let values = calculate_macd(&wave(20), 12, 26, 9);
        assert!(values.iter().all(Option::is_none));
    }

    #[test]
    fn zero_periods_yield_nothing() {
        assert!(calculate_macd(&wave(10), 0, 5, 3).iter().all(Option::is_none));
    }
}

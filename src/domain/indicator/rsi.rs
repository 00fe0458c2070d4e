//! RSI (Relative Strength Index).
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first n closes are undefined (n price changes are needed).

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return values;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;
    values[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    // gains[i - 1] is the change into close i
    for i in (period + 1)..closes.len() {
        avg_gain = (avg_gain * (n - 1.0) + gains[i - 1]) / n;
        avg_loss = (avg_loss * (n - 1.0) + losses[i - 1]) / n;
        values[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

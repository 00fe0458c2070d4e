//! Feature series construction from raw candles.
//!
//! Computes the indicator set over closing prices and joins it to the
//! candles. Rows where any indicator is still warming up are dropped, so the
//! output only holds fully populated [`TimePoint`]s.

use crate::domain::indicator::{
    calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, IndicatorParams,
};
use crate::domain::ohlcv::{closes, OhlcvBar};
use crate::domain::time_point::TimePoint;

pub fn build_feature_series(bars: &[OhlcvBar], params: &IndicatorParams) -> Vec<TimePoint> {
    let closes = closes(bars);
    let rsi = calculate_rsi(&closes, params.rsi_period);
    let ema_fast = calculate_ema(&closes, params.ema_fast);
    let ema_slow = calculate_ema(&closes, params.ema_slow);
    let bollinger = calculate_bollinger(&closes, params.bollinger_period, params.bollinger_stddev);
    let macd = calculate_macd(
        &closes,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
    );

    bars.iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let bands = bollinger[i]?;
            let macd = macd[i]?;
            Some(TimePoint {
                timestamp: bar.timestamp,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                rsi: rsi[i]?,
                ema_fast: ema_fast[i]?,
                ema_slow: ema_slow[i]?,
                bollinger_upper: bands.upper,
                bollinger_lower: bands.lower,
                bollinger_mid: bands.middle,
                macd: macd.line,
                macd_signal: macd.signal,
            })
        })
        .collect()
}

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use dcatrader::domain::error::DcatraderError;
pub use dcatrader::domain::ohlcv::OhlcvBar;
pub use dcatrader::domain::time_point::TimePoint;
use dcatrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, DcatraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DcatraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| {
                let d = b.timestamp.date();
                start_date.is_none_or(|s| d >= s) && end_date.is_none_or(|e| d <= e)
            })
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, DcatraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, DcatraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DcatraderError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.timestamp).min().unwrap();
                let max = bars.iter().map(|b| b.timestamp).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(i: usize) -> NaiveDateTime {
    date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap() + Duration::days(i as i64)
}

/// A neutral row: RSI 50, flat MACD, bands far from the close. Never signals.
pub fn neutral_point(i: usize, close: f64) -> TimePoint {
    TimePoint {
        timestamp: day(i),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1_000.0,
        rsi: 50.0,
        ema_fast: close,
        ema_slow: close,
        bollinger_upper: close * 10.0,
        bollinger_lower: close / 10.0,
        bollinger_mid: close,
        macd: 0.0,
        macd_signal: 0.0,
    }
}

/// Oversold with the close on the lower band: BUY whatever came before.
pub fn buy_point(i: usize, close: f64) -> TimePoint {
    TimePoint {
        rsi: 20.0,
        bollinger_lower: close,
        ..neutral_point(i, close)
    }
}

/// Overbought with the close on the upper band: SELL whatever came before.
pub fn sell_point(i: usize, close: f64) -> TimePoint {
    TimePoint {
        rsi: 80.0,
        bollinger_upper: close,
        ..neutral_point(i, close)
    }
}

/// BUY@95, BUY@90, SELL@110, SELL@120 after an opening neutral row at 100.
pub fn five_point_scenario() -> Vec<TimePoint> {
    vec![
        neutral_point(0, 100.0),
        buy_point(1, 95.0),
        buy_point(2, 90.0),
        sell_point(3, 110.0),
        sell_point(4, 120.0),
    ]
}

/// Neutral row with an explicit MACD line and signal line.
pub fn macd_point(i: usize, close: f64, rsi: f64, macd: f64) -> TimePoint {
    TimePoint {
        rsi,
        macd,
        macd_signal: 0.0,
        ..neutral_point(i, close)
    }
}

/// Same trades as `five_point_scenario`, driven only by MACD crossings.
/// Bands stay at close x10 and close /10, so proximity never fires.
pub fn macd_cross_scenario() -> Vec<TimePoint> {
    vec![
        macd_point(0, 100.0, 50.0, -1.0),
        macd_point(1, 95.0, 25.0, 0.5),   // cross up, oversold: BUY
        macd_point(2, 92.0, 50.0, -1.0),  // back below, neutral RSI
        macd_point(3, 90.0, 28.0, 0.2),   // cross up, oversold: BUY
        macd_point(4, 110.0, 72.0, -0.5), // cross down, overbought: SELL
        macd_point(5, 105.0, 50.0, 1.0),  // back above, neutral RSI
        macd_point(6, 120.0, 75.0, -1.0), // cross down, overbought: SELL, nothing held
    ]
}

/// `bars` with the bar at `index` repeated right after itself.
pub fn with_duplicate_bar(mut bars: Vec<OhlcvBar>, index: usize) -> Vec<OhlcvBar> {
    let dup = bars[index].clone();
    bars.insert(index + 1, dup);
    bars
}

/// Deterministic zig-zag candles, long enough for the default indicator warm-up.
pub fn generate_bars(count: usize, start_price: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let wave = ((i as f64) * 0.35).sin() * 15.0;
            let close = start_price + wave + i as f64 * 0.1;
            OhlcvBar {
                timestamp: day(i),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000.0 + i as f64,
            }
        })
        .collect()
}

pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            b.timestamp.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.close,
            b.volume
        ));
    }
    out
}

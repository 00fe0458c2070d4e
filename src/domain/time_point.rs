//! Feature series row: one candle plus its indicator readings.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub bollinger_upper: f64,
    pub bollinger_lower: f64,
    pub bollinger_mid: f64,
    pub macd: f64,
    pub macd_signal: f64,
}

impl TimePoint {
    /// Named numeric fields, in declaration order.
    pub fn fields(&self) -> [(&'static str, f64); 13] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
            ("rsi", self.rsi),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("bollinger_upper", self.bollinger_upper),
            ("bollinger_lower", self.bollinger_lower),
            ("bollinger_mid", self.bollinger_mid),
            ("macd", self.macd),
            ("macd_signal", self.macd_signal),
        ]
    }
}

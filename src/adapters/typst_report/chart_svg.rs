//! SVG chart rendering for reports.
//!
//! Every chart shares one horizontal axis: point `i` of the feature series
//! maps to the same x coordinate in the price, RSI and MACD panels. Each
//! generator returns an empty string when there is nothing to plot.

use crate::domain::portfolio::EquityPoint;
use crate::domain::signal::Signal;
use crate::domain::time_point::TimePoint;

const WIDTH: f64 = 800.0;
const PADDING: f64 = 40.0;
const PRICE_HEIGHT: f64 = 360.0;
const PANEL_HEIGHT: f64 = 160.0;
const MARKER_SIZE: f64 = 6.0;

/// BUY markers sit this fraction below the bar's low.
pub const BUY_MARKER_OFFSET: f64 = 0.98;
/// SELL markers sit this fraction above the bar's high.
pub const SELL_MARKER_OFFSET: f64 = 1.02;

const CLOSE_COLOR: &str = "#37474f";
const BAND_COLOR: &str = "#6464ff";
const EMA_FAST_COLOR: &str = "#ff9800";
const EMA_SLOW_COLOR: &str = "#9c27b0";
const BUY_COLOR: &str = "#26a69a";
const SELL_COLOR: &str = "#ef5350";
const RSI_COLOR: &str = "#00bcd4";
const EQUITY_COLOR: &str = "#1565c0";

/// Maps series index and value onto the plot area.
struct Frame {
    height: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl Frame {
    fn new(height: f64, count: usize, values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = if min.is_finite() { (min, max) } else { (0.0, 1.0) };
        Frame {
            height,
            min,
            max,
            count,
        }
    }

    fn x(&self, index: usize) -> f64 {
        let plot_width = WIDTH - 2.0 * PADDING;
        if self.count > 1 {
            PADDING + index as f64 * plot_width / (self.count - 1) as f64
        } else {
            PADDING + plot_width / 2.0
        }
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = self.height - 2.0 * PADDING;
        let range = self.max - self.min;
        if range > 0.0 {
            self.height - PADDING - (value - self.min) / range * plot_height
        } else {
            self.height / 2.0
        }
    }

    fn open(&self, title: &str) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
            w = WIDTH,
            h = self.height
        );
        svg.push_str(&format!(
            r#"<rect width="{:.0}" height="{:.0}" fill="white"/>"#,
            WIDTH, self.height
        ));
        svg.push_str(&format!(
            r#"<text x="{:.0}" y="20" font-family="sans-serif" font-size="13">{}</text>"#,
            PADDING,
            escape_xml(title)
        ));
        svg.push_str(&self.axes());
        svg.push_str(&self.scale_labels());
        svg
    }

    fn axes(&self) -> String {
        format!(
            r#"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="black"/><line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="black"/>"#,
            p = PADDING,
            b = self.height - PADDING,
            r = WIDTH - PADDING
        )
    }

    fn scale_labels(&self) -> String {
        format!(
            r#"<text x="2" y="{:.1}" font-family="sans-serif" font-size="9">{:.2}</text><text x="2" y="{:.1}" font-family="sans-serif" font-size="9">{:.2}</text>"#,
            PADDING + 4.0,
            self.max,
            self.height - PADDING,
            self.min
        )
    }

    fn polyline(&self, values: impl Iterator<Item = f64>, color: &str, dashed: bool) -> String {
        let points: Vec<String> = values
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", self.x(i), self.y(v)))
            .collect();
        let dash = if dashed { r#" stroke-dasharray="4 3""# } else { "" };
        format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"{}/>"#,
            points.join(" "),
            color,
            dash
        )
    }

    fn guide(&self, value: f64, color: &str) -> String {
        let y = self.y(value);
        format!(
            r#"<line x1="{:.0}" y1="{y:.1}" x2="{:.0}" y2="{y:.1}" stroke="{}" stroke-dasharray="4 3" stroke-opacity="0.6"/>"#,
            PADDING,
            WIDTH - PADDING,
            color
        )
    }
}

fn triangle(x: f64, y: f64, pointing_up: bool, color: &str) -> String {
    let s = MARKER_SIZE;
    let (tip, base) = if pointing_up { (y - s, y + s) } else { (y + s, y - s) };
    format!(
        r#"<polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" fill="{}"/>"#,
        x,
        tip,
        x - s,
        base,
        x + s,
        base,
        color
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Close, Bollinger bands, both EMAs and the BUY/SELL markers.
pub fn generate_price_svg(symbol: &str, series: &[TimePoint], signals: &[Signal]) -> String {
    if series.is_empty() {
        return String::new();
    }

    let frame = Frame::new(
        PRICE_HEIGHT,
        series.len(),
        series.iter().flat_map(|p| {
            [
                p.close,
                p.bollinger_upper,
                p.bollinger_lower,
                p.ema_fast,
                p.ema_slow,
                p.low * BUY_MARKER_OFFSET,
                p.high * SELL_MARKER_OFFSET,
            ]
        }),
    );

    let mut svg = frame.open(&format!("{} price and signals", symbol));
    svg.push_str(&frame.polyline(series.iter().map(|p| p.bollinger_upper), BAND_COLOR, true));
    svg.push_str(&frame.polyline(series.iter().map(|p| p.bollinger_lower), BAND_COLOR, true));
    svg.push_str(&frame.polyline(series.iter().map(|p| p.ema_fast), EMA_FAST_COLOR, false));
    svg.push_str(&frame.polyline(series.iter().map(|p| p.ema_slow), EMA_SLOW_COLOR, false));
    svg.push_str(&frame.polyline(series.iter().map(|p| p.close), CLOSE_COLOR, false));

    for (i, (point, signal)) in series.iter().zip(signals).enumerate() {
        match signal {
            Signal::Buy => svg.push_str(&triangle(
                frame.x(i),
                frame.y(point.low * BUY_MARKER_OFFSET),
                true,
                BUY_COLOR,
            )),
            Signal::Sell => svg.push_str(&triangle(
                frame.x(i),
                frame.y(point.high * SELL_MARKER_OFFSET),
                false,
                SELL_COLOR,
            )),
            Signal::Hold => {}
        }
    }

    svg.push_str("</svg>");
    svg
}

/// RSI on a fixed 0..100 scale with the oversold/overbought guides.
pub fn generate_rsi_svg(series: &[TimePoint], oversold: f64, overbought: f64) -> String {
    if series.is_empty() {
        return String::new();
    }

    let frame = Frame::new(PANEL_HEIGHT, series.len(), [0.0, 100.0].into_iter());
    let mut svg = frame.open("RSI");
    svg.push_str(&frame.guide(overbought, SELL_COLOR));
    svg.push_str(&frame.guide(oversold, BUY_COLOR));
    svg.push_str(&frame.polyline(series.iter().map(|p| p.rsi), RSI_COLOR, false));
    svg.push_str("</svg>");
    svg
}

/// MACD line and signal line around a zero guide.
pub fn generate_macd_svg(series: &[TimePoint]) -> String {
    if series.is_empty() {
        return String::new();
    }

    let frame = Frame::new(
        PANEL_HEIGHT,
        series.len(),
        series
            .iter()
            .flat_map(|p| [p.macd, p.macd_signal])
            .chain(std::iter::once(0.0)),
    );
    let mut svg = frame.open("MACD");
    svg.push_str(&frame.guide(0.0, CLOSE_COLOR));
    svg.push_str(&frame.polyline(series.iter().map(|p| p.macd), EMA_FAST_COLOR, false));
    svg.push_str(&frame.polyline(series.iter().map(|p| p.macd_signal), EMA_SLOW_COLOR, false));
    svg.push_str("</svg>");
    svg
}

pub fn generate_equity_svg(equity_curve: &[EquityPoint]) -> String {
    if equity_curve.is_empty() {
        return String::new();
    }

    let frame = Frame::new(
        PANEL_HEIGHT,
        equity_curve.len(),
        equity_curve.iter().map(|p| p.equity),
    );
    let mut svg = frame.open("Equity");
    svg.push_str(&frame.polyline(equity_curve.iter().map(|p| p.equity), EQUITY_COLOR, false));
    svg.push_str("</svg>");
    svg
}

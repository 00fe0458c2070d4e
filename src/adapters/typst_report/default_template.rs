//! Built-in Typst report template.
//!
//! A custom template may use any subset of the placeholders below; unknown
//! text passes through untouched.
//!
//! | Placeholder            | Content                                  |
//! |------------------------|------------------------------------------|
//! | `{{SYMBOL}}`           | escaped symbol                           |
//! | `{{RUN_SUMMARY}}`      | symbol, period, capital, signal counts   |
//! | `{{RESULTS_TABLE}}`    | bot vs buy-and-hold                      |
//! | `{{PRICE_CHART_SVG}}`  | close, bands, EMAs, BUY/SELL markers     |
//! | `{{RSI_CHART_SVG}}`    | RSI with oversold/overbought guides      |
//! | `{{MACD_CHART_SVG}}`   | MACD and signal line                     |
//! | `{{EQUITY_CURVE_SVG}}` | mark-to-market equity per point          |
//! | `{{TRADE_LEDGER}}`     | every executed trade                     |

const TEMPLATE: &str = r#"#set page(paper: "a4", margin: 1.5cm)
#set text(size: 10pt)

= Backtest Report: {{SYMBOL}}

== Run
{{RUN_SUMMARY}}

== Results
{{RESULTS_TABLE}}

== Price & Signals
{{PRICE_CHART_SVG}}

== RSI
{{RSI_CHART_SVG}}

== MACD
{{MACD_CHART_SVG}}

== Equity Curve
{{EQUITY_CURVE_SVG}}

== Trade Ledger
{{TRADE_LEDGER}}
"#;

pub fn template() -> &'static str {
    TEMPLATE
}

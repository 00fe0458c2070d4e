//! Typst report generation.
//!
//! Reads a Typst template (the built-in default or a custom file), resolves
//! every `{{PLACEHOLDER}}` with markup from `chart_svg` and `tables`, and
//! writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::domain::backtest::BacktestRun;
use crate::domain::error::DcatraderError;
use crate::domain::signal::SignalParams;
use crate::ports::report_port::ReportPort;

/// Context for resolving template placeholders.
pub struct ReportContext<'a> {
    pub symbol: &'a str,
    pub run: &'a BacktestRun,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

fn embed_svg(svg: &str, empty_note: &str) -> String {
    if svg.is_empty() {
        format!("_{}_", empty_note)
    } else {
        format!(
            "#image.decode(\n\"{}\",\n  width: 100%,\n)",
            svg.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup.
pub fn resolve(template: &str, ctx: &ReportContext) -> String {
    let run = ctx.run;
    let mut output = template.to_string();

    output = output.replace("{{SYMBOL}}", &tables::escape_typst(ctx.symbol));
    output = output.replace(
        "{{RUN_SUMMARY}}",
        &tables::render_run_summary(ctx.symbol, run),
    );
    output = output.replace("{{RESULTS_TABLE}}", &tables::render_results_table(run));

    let price = chart_svg::generate_price_svg(ctx.symbol, &run.series, &run.signals);
    output = output.replace("{{PRICE_CHART_SVG}}", &embed_svg(&price, "No price data."));

    let rsi = chart_svg::generate_rsi_svg(&run.series, ctx.rsi_oversold, ctx.rsi_overbought);
    output = output.replace("{{RSI_CHART_SVG}}", &embed_svg(&rsi, "No RSI data."));

    let macd = chart_svg::generate_macd_svg(&run.series);
    output = output.replace("{{MACD_CHART_SVG}}", &embed_svg(&macd, "No MACD data."));

    let equity = chart_svg::generate_equity_svg(&run.equity_curve);
    output = output.replace("{{EQUITY_CURVE_SVG}}", &embed_svg(&equity, "No equity data."));

    output = output.replace(
        "{{TRADE_LEDGER}}",
        &tables::render_trade_ledger(&run.result.trades),
    );

    output
}

/// Writes a `.typ` report through [`resolve`].
pub struct TypstReportAdapter {
    template_path: Option<PathBuf>,
    rsi_oversold: f64,
    rsi_overbought: f64,
}

impl TypstReportAdapter {
    pub fn new(template_path: Option<PathBuf>) -> Self {
        let defaults = SignalParams::default();
        Self {
            template_path,
            rsi_oversold: defaults.rsi_oversold,
            rsi_overbought: defaults.rsi_overbought,
        }
    }

    /// Draw the RSI guides at the levels the run actually used.
    pub fn with_rsi_guides(mut self, params: &SignalParams) -> Self {
        self.rsi_oversold = params.rsi_oversold;
        self.rsi_overbought = params.rsi_overbought;
        self
    }

    fn load_template(&self) -> Result<String, DcatraderError> {
        match &self.template_path {
            Some(path) => fs::read_to_string(path).map_err(DcatraderError::from),
            None => Ok(default_template::template().to_string()),
        }
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(
        &self,
        run: &BacktestRun,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), DcatraderError> {
        let template = self.load_template()?;
        let ctx = ReportContext {
            symbol,
            run,
            rsi_oversold: self.rsi_oversold,
            rsi_overbought: self.rsi_overbought,
        };
        fs::write(output_path, resolve(&template, &ctx))?;
        info!("typst report written to {}", output_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::BacktestResult;
    use crate::domain::portfolio::EquityPoint;
    use crate::domain::signal::Signal;
    use crate::domain::time_point::TimePoint;
    use crate::domain::trade::{Trade, TradeAction};
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn point(day: u32, close: f64) -> TimePoint {
        TimePoint {
            timestamp: ts(day),
            open: close,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume: 100.0,
            rsi: 45.0,
            ema_fast: close,
            ema_slow: close - 1.0,
            bollinger_upper: close + 10.0,
            bollinger_lower: close - 10.0,
            bollinger_mid: close,
            macd: 0.2,
            macd_signal: 0.1,
        }
    }

    fn sample_run() -> BacktestRun {
        let trades = vec![
            Trade {
                timestamp: ts(2),
                price: 90.0,
                action: TradeAction::Buy {
                    quantity: 10.0,
                    spent: 900.0,
                },
            },
            Trade {
                timestamp: ts(3),
                price: 120.0,
                action: TradeAction::Sell {
                    quantity: 10.0,
                    capital: 1200.0,
                },
            },
        ];
        BacktestRun {
            series: vec![point(1, 100.0), point(2, 90.0), point(3, 120.0)],
            signals: vec![Signal::Hold, Signal::Buy, Signal::Sell],
            result: BacktestResult {
                initial_capital: 900.0,
                final_capital: 1200.0,
                total_return_pct: 100.0 / 3.0,
                buy_hold_pct: 20.0,
                num_trades: 2,
                trades,
            },
            equity_curve: vec![
                EquityPoint {
                    timestamp: ts(1),
                    equity: 900.0,
                },
                EquityPoint {
                    timestamp: ts(2),
                    equity: 900.0,
                },
                EquityPoint {
                    timestamp: ts(3),
                    equity: 1200.0,
                },
            ],
            capital_per_buy: 900.0,
        }
    }

    fn ctx(run: &BacktestRun) -> ReportContext<'_> {
        ReportContext {
            symbol: "BTC-USD",
            run,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }

    #[test]
    fn resolve_default_template_no_placeholders_remain() {
        let run = sample_run();
        let output = resolve(default_template::template(), &ctx(&run));
        assert!(
            !output.contains("{{"),
            "unresolved placeholder in output: {output}"
        );
    }

    #[test]
    fn resolve_produces_valid_typst() {
        let run = sample_run();
        let output = resolve(default_template::template(), &ctx(&run));
        assert!(output.contains("#set page("));
        assert!(output.contains("= Backtest Report: BTC-USD"));
        assert!(output.contains("#table("));
        assert!(output.contains("#image.decode("));
        assert!(output.contains("+33.33%"));
        assert!(output.contains("[1200.00]"));
    }

    #[test]
    fn embedded_svg_quotes_are_escaped() {
        let run = sample_run();
        let output = resolve("{{EQUITY_CURVE_SVG}}", &ctx(&run));
        assert!(output.contains("xmlns=\\\"http://www.w3.org/2000/svg\\\""));
    }

    #[test]
    fn empty_run_renders_notes() {
        let mut run = sample_run();
        run.series.clear();
        run.signals.clear();
        run.equity_curve.clear();
        let output = resolve(
            "{{PRICE_CHART_SVG}}|{{EQUITY_CURVE_SVG}}",
            &ctx(&run),
        );
        assert_eq!(output, "_No price data._|_No equity data._");
    }

    #[test]
    fn resolve_custom_template() {
        let run = sample_run();
        let custom = "= My Report\n{{RESULTS_TABLE}}\n{{TRADE_LEDGER}}";
        let output = resolve(custom, &ctx(&run));
        assert!(output.contains("= My Report"));
        assert!(output.contains("Bot Performance"));
        assert!(!output.contains("{{"));
    }

    #[test]
    fn adapter_writes_report_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.typ");
        let adapter = TypstReportAdapter::new(None).with_rsi_guides(&SignalParams {
            rsi_oversold: 25.0,
            rsi_overbought: 75.0,
            ..Default::default()
        });

        adapter
            .write(&sample_run(), "BTC-USD", out.to_str().unwrap())
            .unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("= Backtest Report: BTC-USD"));
        assert!(written.contains("Trade Ledger"));
    }

    #[test]
    fn adapter_uses_custom_template_file() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("custom.typ");
        fs::write(&template, "Custom {{SYMBOL}}").unwrap();
        let out = dir.path().join("report.typ");

        TypstReportAdapter::new(Some(template))
            .write(&sample_run(), "ETH", out.to_str().unwrap())
            .unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), "Custom ETH");
    }

    #[test]
    fn adapter_missing_template_is_io_error() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.typ");
        let err = TypstReportAdapter::new(Some(dir.path().join("nope.typ")))
            .write(&sample_run(), "ETH", out.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, DcatraderError::Io(_)));
    }
}

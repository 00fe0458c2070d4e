//! Table formatting for reports.
//!
//! Generates Typst markup for the run summary, the results comparison and
//! the trade ledger. Monetary values and percentages are rounded to two
//! decimals here and nowhere earlier.

use crate::domain::backtest::BacktestRun;
use crate::domain::metrics::max_drawdown;
use crate::domain::signal::count_signals;
use crate::domain::trade::{Trade, TradeAction};

const WIN_FILL: &str = "rgb(\"#E0FFE0\")";
const LOSE_FILL: &str = "rgb(\"#FFF3E0\")";

/// Escape characters that carry markup meaning inside Typst content blocks.
pub fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(
            c,
            '\\' | '#' | '$' | '*' | '_' | '[' | ']' | '@' | '<' | '>' | '`' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn fmt_money(value: f64) -> String {
    if value < 0.0 {
        format!("-{:.2}", value.abs())
    } else {
        format!("{:.2}", value)
    }
}

pub fn fmt_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

pub fn render_run_summary(symbol: &str, run: &BacktestRun) -> String {
    let counts = count_signals(&run.signals);
    let period = match (run.series.first(), run.series.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first.timestamp, last.timestamp),
        _ => "-".to_string(),
    };

    let mut out = String::from("#table(\n  columns: 2,\n  [*Property*], [*Value*],\n");
    out.push_str(&format!("  [Symbol], [{}],\n", escape_typst(symbol)));
    out.push_str(&format!("  [Period], [{}],\n", period));
    out.push_str(&format!("  [Points], [{}],\n", run.series.len()));
    out.push_str(&format!(
        "  [Initial Capital], [{}],\n",
        fmt_money(run.result.initial_capital)
    ));
    out.push_str(&format!(
        "  [Capital per BUY], [{}],\n",
        fmt_money(run.capital_per_buy)
    ));
    out.push_str(&format!(
        "  [Signals], [{} BUY / {} SELL / {} HOLD],\n",
        counts.buys, counts.sells, counts.holds
    ));
    out.push_str(")\n");
    out
}

/// Bot against buy-and-hold. The bot row is green when it wins, amber otherwise.
pub fn render_results_table(run: &BacktestRun) -> String {
    let r = &run.result;
    let fill = if r.beats_buy_and_hold() { WIN_FILL } else { LOSE_FILL };

    let mut out = String::from("#table(\n  columns: 2,\n  [*Metric*], [*Value*],\n");
    out.push_str(&format!(
        "  table.cell(fill: {fill})[*Bot Performance*], table.cell(fill: {fill})[*{}*],\n",
        fmt_pct(r.total_return_pct)
    ));
    out.push_str(&format!("  [Buy & Hold], [{}],\n", fmt_pct(r.buy_hold_pct)));
    out.push_str(&format!(
        "  [Excess Return], [{}],\n",
        fmt_pct(r.excess_return_pct())
    ));
    out.push_str(&format!(
        "  [Final Capital], [{}],\n",
        fmt_money(r.final_capital)
    ));
    out.push_str(&format!("  [Trades], [{}],\n", r.num_trades));
    out.push_str(&format!(
        "  [Max Drawdown], [{:.2}%],\n",
        max_drawdown(&run.equity_curve) * 100.0
    ));
    out.push_str(")\n");
    out
}

pub fn render_trade_ledger(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "_No trades executed._\n".to_string();
    }

    let mut out = String::from(
        "#table(\n  columns: 6,\n  [*\\#*], [*Timestamp*], [*Action*], [*Price*], [*Quantity*], [*Cash Flow*],\n",
    );
    for (i, trade) in trades.iter().enumerate() {
        let action = match trade.action {
            TradeAction::Buy { .. } => "text(fill: rgb(\"#26a69a\"))[BUY]",
            TradeAction::Sell { .. } => "text(fill: rgb(\"#ef5350\"))[SELL]",
        };
        out.push_str(&format!(
            "  [{}], [{}], {}, [{}], [{:.6}], [{}],\n",
            i + 1,
            trade.timestamp,
            action,
            fmt_money(trade.price),
            trade.quantity(),
            fmt_money(trade.cash_flow())
        ));
    }
    out.push_str(")\n");
    out
}

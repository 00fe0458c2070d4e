//! CSV export of the trade ledger and the aligned signal series.
//!
//! Values are written at full precision so the ledger can be replayed
//! against the reported final capital.

use std::path::{Path, PathBuf};

use log::info;

use crate::domain::backtest::BacktestRun;
use crate::domain::error::DcatraderError;
use crate::domain::trade::TradeAction;
use crate::ports::report_port::ReportPort;

const LEDGER_HEADER: [&str; 7] = [
    "timestamp",
    "action",
    "price",
    "quantity",
    "cash_flow",
    "spent",
    "capital",
];

const SIGNALS_HEADER: [&str; 9] = [
    "timestamp",
    "close",
    "rsi",
    "macd",
    "macd_signal",
    "bollinger_lower",
    "bollinger_upper",
    "signal",
    "action",
];

pub struct CsvLedgerAdapter;

fn csv_error(path: &Path, e: csv::Error) -> DcatraderError {
    DcatraderError::Data {
        reason: format!("failed to write {}: {}", path.display(), e),
    }
}

/// `trades.csv` -> `trades_signals.csv`, in the same directory.
pub fn signals_path(ledger_path: &Path) -> PathBuf {
    let stem = ledger_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());
    ledger_path.with_file_name(format!("{}_signals.csv", stem))
}

impl CsvLedgerAdapter {
    fn write_ledger(run: &BacktestRun, path: &Path) -> Result<(), DcatraderError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
        wtr.write_record(LEDGER_HEADER)
            .map_err(|e| csv_error(path, e))?;

        for trade in &run.result.trades {
            let (spent, capital) = match trade.action {
                TradeAction::Buy { spent, .. } => (spent.to_string(), String::new()),
                TradeAction::Sell { capital, .. } => (String::new(), capital.to_string()),
            };
            wtr.write_record([
                trade.timestamp.to_string(),
                trade.action.to_string(),
                trade.price.to_string(),
                trade.quantity().to_string(),
                trade.cash_flow().to_string(),
                spent,
                capital,
            ])
            .map_err(|e| csv_error(path, e))?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_signals(run: &BacktestRun, path: &Path) -> Result<(), DcatraderError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
        wtr.write_record(SIGNALS_HEADER)
            .map_err(|e| csv_error(path, e))?;

        for (point, signal) in run.series.iter().zip(&run.signals) {
            wtr.write_record([
                point.timestamp.to_string(),
                point.close.to_string(),
                point.rsi.to_string(),
                point.macd.to_string(),
                point.macd_signal.to_string(),
                point.bollinger_lower.to_string(),
                point.bollinger_upper.to_string(),
                signal.as_i8().to_string(),
                signal.to_string(),
            ])
            .map_err(|e| csv_error(path, e))?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvLedgerAdapter {
    fn write(
        &self,
        run: &BacktestRun,
        _symbol: &str,
        output_path: &str,
    ) -> Result<(), DcatraderError> {
        let ledger = Path::new(output_path);
        Self::write_ledger(run, ledger)?;

        let signals = signals_path(ledger);
        Self::write_signals(run, &signals)?;

        info!(
            "ledger written to {}, signals to {}",
            ledger.display(),
            signals.display()
        );
        Ok(())
    }
}

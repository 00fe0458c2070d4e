//! Report generation port.

use crate::domain::backtest::BacktestRun;
use crate::domain::error::DcatraderError;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        run: &BacktestRun,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), DcatraderError>;
}

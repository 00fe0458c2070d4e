//! Market data access port.

use crate::domain::error::DcatraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::{NaiveDate, NaiveDateTime};

pub trait DataPort {
    /// Bars for `symbol` within the inclusive date range, sorted ascending.
    /// An absent bound leaves that side of the range open.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, DcatraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, DcatraderError>;

    /// First timestamp, last timestamp and bar count, or `None` without data.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, DcatraderError>;
}

//! Domain error types.

use chrono::NaiveDateTime;

/// Top-level error type for dcatrader.
#[derive(Debug, thiserror::Error)]
pub enum DcatraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("feature series is empty")]
    EmptySeries,

    #[error("timestamps not strictly ascending at index {index} ({timestamp})")]
    UnsortedTimestamps {
        index: usize,
        timestamp: NaiveDateTime,
    },

    #[error("missing {field} at index {index} ({timestamp})")]
    MissingIndicator {
        index: usize,
        timestamp: NaiveDateTime,
        field: &'static str,
    },

    #[error("non-positive price {price} at index {index} ({timestamp})")]
    NonPositivePrice {
        index: usize,
        timestamp: NaiveDateTime,
        price: f64,
    },

    #[error("initial capital must be positive, got {value}")]
    InvalidCapital { value: f64 },

    #[error("signal series has {signals} entries but feature series has {series}")]
    SignalLengthMismatch { series: usize, signals: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DcatraderError {
    /// True for precondition violations on the simulation input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DcatraderError::EmptySeries
                | DcatraderError::UnsortedTimestamps { .. }
                | DcatraderError::MissingIndicator { .. }
                | DcatraderError::NonPositivePrice { .. }
                | DcatraderError::InvalidCapital { .. }
                | DcatraderError::SignalLengthMismatch { .. }
        )
    }
}

impl From<&DcatraderError> for std::process::ExitCode {
    fn from(err: &DcatraderError) -> Self {
        let code: u8 = match err {
            DcatraderError::Io(_) => 1,
            DcatraderError::ConfigParse { .. }
            | DcatraderError::ConfigMissing { .. }
            | DcatraderError::ConfigInvalid { .. } => 2,
            DcatraderError::Data { .. }
            | DcatraderError::NoData { .. }
            | DcatraderError::InsufficientData { .. } => 3,
            DcatraderError::EmptySeries
            | DcatraderError::UnsortedTimestamps { .. }
            | DcatraderError::MissingIndicator { .. }
            | DcatraderError::NonPositivePrice { .. }
            | DcatraderError::InvalidCapital { .. }
            | DcatraderError::SignalLengthMismatch { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

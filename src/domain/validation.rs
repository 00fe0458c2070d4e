//! Precondition checks on simulation input.
//!
//! Everything here runs before any portfolio state is created, so a failing
//! check means nothing was simulated.

use crate::domain::error::DcatraderError;
use crate::domain::signal::Signal;
use crate::domain::time_point::TimePoint;

pub fn validate_capital(initial_capital: f64) -> Result<(), DcatraderError> {
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(DcatraderError::InvalidCapital {
            value: initial_capital,
        });
    }
    Ok(())
}

/// Non-empty, strictly ascending timestamps, every field finite, every close
/// positive. Reports the first offending index.
pub fn validate_series(series: &[TimePoint]) -> Result<(), DcatraderError> {
    if series.is_empty() {
        return Err(DcatraderError::EmptySeries);
    }

    for (index, point) in series.iter().enumerate() {
        if index > 0 && point.timestamp <= series[index - 1].timestamp {
            return Err(DcatraderError::UnsortedTimestamps {
                index,
                timestamp: point.timestamp,
            });
        }

        if let Some((field, _)) = point.fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(DcatraderError::MissingIndicator {
                index,
                timestamp: point.timestamp,
                field,
            });
        }

        if point.close <= 0.0 {
            return Err(DcatraderError::NonPositivePrice {
                index,
                timestamp: point.timestamp,
                price: point.close,
            });
        }
    }

    Ok(())
}

pub fn validate_alignment(series: &[TimePoint], signals: &[Signal]) -> Result<(), DcatraderError> {
    if series.len() != signals.len() {
        return Err(DcatraderError::SignalLengthMismatch {
            series: series.len(),
            signals: signals.len(),
        });
    }
    Ok(())
}

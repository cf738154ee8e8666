//! Risk/return metrics: pure functions over a closing-price series.
//!
//! Every metric takes a `PriceSeries` and returns an unrounded fraction.
//! Rounding to display percentages happens in `report`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tickerwatch_core::domain::PriceSeries;

/// Errors from metric computation.
///
/// Metrics never default to zero on bad input; an empty series or a zero
/// starting price is an error the caller must handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("insufficient data: price series is empty")]
    InsufficientData,
    #[error("division by zero: first close price is 0")]
    DivisionByZero,
}

/// ROI and maximum drawdown for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskReturn {
    pub roi: f64,
    pub max_drawdown: f64,
}

impl RiskReturn {
    pub fn compute(series: &PriceSeries) -> Result<Self, MetricError> {
        Ok(Self {
            roi: roi(series)?,
            max_drawdown: max_drawdown(series)?,
        })
    }
}

/// Return on investment as a fraction: (last - first) / first.
///
/// A single-point series has a return of 0.0.
pub fn roi(series: &PriceSeries) -> Result<f64, MetricError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.close_price(), last.close_price()),
        _ => return Err(MetricError::InsufficientData),
    };
    if first == 0.0 {
        return Err(MetricError::DivisionByZero);
    }
    Ok((last - first) / first)
}

/// Maximum drawdown as a positive fraction in [0, 1] (e.g. 0.15 = 15% drawdown).
///
/// Single forward pass tracking the running peak. While the peak is 0 no
/// drawdown can be measured, so points are skipped until a positive close
/// raises it. Returns 0.0 for a single point or a non-decreasing series.
pub fn max_drawdown(series: &PriceSeries) -> Result<f64, MetricError> {
    let mut closes = series.closes();
    let mut peak = closes.next().ok_or(MetricError::InsufficientData)?;
    let mut max_dd = 0.0_f64;

    for close in closes {
        if close > peak {
            peak = close;
        } else if peak > 0.0 {
            let dd = (peak - close) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    Ok(max_dd)
}

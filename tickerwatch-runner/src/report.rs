//! Run report and the text of the result notification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tickerwatch_core::domain::{PriceRequest, PriceSeries, DATE_FORMAT};

use crate::metrics::{MetricError, RiskReturn};
use crate::notify::NotificationMessage;

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub ticker: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub points: usize,
    /// Unrounded fractions.
    pub metrics: RiskReturn,
}

impl RunReport {
    /// Compute metrics for `series` and summarize it.
    pub fn from_series(ticker: &str, series: &PriceSeries) -> Result<Self, MetricError> {
        let metrics = RiskReturn::compute(series)?;
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (first.date(), last.date()),
            _ => return Err(MetricError::InsufficientData),
        };
        Ok(Self {
            ticker: ticker.to_string(),
            first_date: first,
            last_date: last,
            points: series.len(),
            metrics,
        })
    }

    pub fn body(&self) -> String {
        format_body(self.metrics.roi, self.metrics.max_drawdown)
    }

    pub fn to_message(&self, recipient: &str, request: &PriceRequest) -> NotificationMessage {
        NotificationMessage::new(recipient, subject(request), self.body())
    }
}

/// Fraction to percent, rounded to one decimal place (half away from zero).
pub fn to_percent(fraction: f64) -> f64 {
    // + 0.0 folds -0.0 into 0.0 so tiny losses don't print as "-0.0"
    (fraction * 1000.0).round() / 10.0 + 0.0
}

/// The two-line notification body.
pub fn format_body(roi: f64, max_drawdown: f64) -> String {
    format!(
        "ROI: {:.1} %\nMax drawdown: {:.1} %",
        to_percent(roi),
        to_percent(max_drawdown)
    )
}

pub fn subject(request: &PriceRequest) -> String {
    format!(
        "{} performance since {}",
        request.ticker(),
        request.start().format(DATE_FORMAT)
    )
}

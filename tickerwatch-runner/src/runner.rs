//! Pipeline runner: wires together fetch, validation, reshaping, metrics, and notification.
//!
//! One `run` handles one request start to finish:
//! fetch (with retry) → validate → reshape → ROI + max drawdown → notify.

use log::{info, warn};
use thiserror::Error;

use tickerwatch_core::data::{reshape, validate, DataError, PriceProvider, RawResponse};
use tickerwatch_core::domain::PriceRequest;

use crate::metrics::MetricError;
use crate::notify::{Notifier, NotifyError};
use crate::report::RunReport;
use crate::retry::RetryPolicy;

/// Logged when a response carries no error marker but has no usable table.
pub const UNEXPECTED_RESULT: &str = "unexpected result from data provider";

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("fetch failed after {attempts} attempt(s): {source}")]
    Fetch {
        attempts: u32,
        #[source]
        source: DataError,
    },
    #[error("could not reshape response: {0}")]
    Reshape(#[source] DataError),
    #[error("metric error: {0}")]
    Metric(#[from] MetricError),
    #[error("notification failed: {0}")]
    Notify(#[from] NotifyError),
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Metrics computed and the notification delivered.
    Notified(RunReport),
    /// The response had no usable price table; nothing was computed or sent.
    Skipped,
}

/// Request-scoped pipeline over a provider and a notification sink.
///
/// Holds no per-request state; the same pipeline can serve any number of
/// sequential requests.
pub struct Pipeline<'a> {
    provider: &'a dyn PriceProvider,
    notifier: &'a dyn Notifier,
    retry: RetryPolicy,
}

impl<'a> Pipeline<'a> {
    pub fn new(provider: &'a dyn PriceProvider, notifier: &'a dyn Notifier) -> Self {
        Self {
            provider,
            notifier,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the full pipeline for one request and notify `recipient`.
    pub fn run(&self, request: &PriceRequest, recipient: &str) -> Result<RunOutcome, RunError> {
        let response = self.fetch(request)?;

        let Some(report) = self.evaluate(request, &response)? else {
            return Ok(RunOutcome::Skipped);
        };

        let message = report.to_message(recipient, request);
        info!(
            "delivering {} report to {recipient} via {}",
            request.ticker(),
            self.notifier.name()
        );
        self.notifier.deliver(&message)?;
        Ok(RunOutcome::Notified(report))
    }

    /// Fetch through the retry policy. Returns the first successful response.
    pub fn fetch(&self, request: &PriceRequest) -> Result<RawResponse, RunError> {
        let mut attempts = 0;
        self.retry
            .run(|_| {
                attempts += 1;
                self.provider.fetch(request)
            })
            .map_err(|source| RunError::Fetch { attempts, source })
    }

    /// Validate, reshape, and compute metrics for a fetched response.
    ///
    /// `Ok(None)` means the response failed validation; that is reported in
    /// the log and is not an error.
    pub fn evaluate(
        &self,
        request: &PriceRequest,
        response: &RawResponse,
    ) -> Result<Option<RunReport>, RunError> {
        if !validate(response) {
            warn!(
                "{UNEXPECTED_RESULT}: no usable price table for {} from {}",
                request.ticker(),
                self.provider.name()
            );
            return Ok(None);
        }

        let series = reshape(response).map_err(RunError::Reshape)?;
        let report = RunReport::from_series(request.ticker(), &series)?;
        info!(
            "{}: {} closes from {} to {}",
            report.ticker, report.points, report.first_date, report.last_date
        );
        Ok(Some(report))
    }
}

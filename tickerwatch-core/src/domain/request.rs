//! A single price-history request: ticker plus date range.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Longest ticker accepted.
pub const MAX_TICKER_LEN: usize = 16;

/// Date format for request dates and response rows.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("ticker is empty")]
    EmptyTicker,
    #[error("invalid ticker '{0}': only letters, digits, '.' and '-' are allowed (max 16 chars)")]
    InvalidTicker(String),
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("end date {end} is before start date {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Ticker and date range for one pipeline run.
///
/// Tickers are normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRequest {
    ticker: String,
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl PriceRequest {
    pub fn new(ticker: &str, start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, RequestError> {
        let ticker = normalize_ticker(ticker)?;
        if let Some(end) = end {
            if end < start {
                return Err(RequestError::InvertedRange { start, end });
            }
        }
        Ok(Self { ticker, start, end })
    }

    /// Parse a request from command-line strings, e.g. `("aapl", "2017-08-01", None)`.
    pub fn parse(ticker: &str, start: &str, end: Option<&str>) -> Result<Self, RequestError> {
        let start = parse_date(start)?;
        let end = end.map(parse_date).transpose()?;
        Self::new(ticker, start, end)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, RequestError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| RequestError::InvalidDate(s.to_string()))
}

fn normalize_ticker(raw: &str) -> Result<String, RequestError> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return Err(RequestError::EmptyTicker);
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '.' || c == '-';
    if ticker.len() > MAX_TICKER_LEN || !ticker.chars().all(allowed) {
        return Err(RequestError::InvalidTicker(ticker.to_string()));
    }
    Ok(ticker.to_ascii_uppercase())
}

//! Quandl (Nasdaq Data Link) datatables provider.
//!
//! Fetches daily closing prices from the datatables API, e.g.
//! `WIKI/PRICES.json?ticker=AAPL&date.gte=2017-08-01&qopts.columns=date,close`.
//! The provider performs a single request per `fetch`; retrying is the
//! caller's job (see the runner's retry policy).

use std::time::Duration;

use log::{debug, info};
use reqwest::header::RETRY_AFTER;

use super::provider::{DataError, PriceProvider, RawResponse};
use crate::domain::{PriceRequest, DATE_FORMAT};

pub const DEFAULT_BASE_URL: &str = "https://data.nasdaq.com/api/v3/datatables";
pub const DEFAULT_DATASET: &str = "WIKI/PRICES";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API error codes meaning the ticker or table does not exist.
const NOT_FOUND_CODES: &[&str] = &["QECx02", "QEPx02"];

/// Fallback when a 429 carries no usable `retry-after` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Datatables API provider.
pub struct QuandlProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    dataset: String,
}

impl QuandlProvider {
    pub fn new(base_url: &str, dataset: &str, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tickerwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset: dataset.trim_matches('/').to_string(),
        })
    }

    /// Provider against the public endpoint with default dataset and timeout.
    pub fn with_defaults() -> Result<Self, DataError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_DATASET, DEFAULT_TIMEOUT)
    }

    /// Build the datatables URL for a request.
    ///
    /// Tickers are restricted to URL-safe characters by `PriceRequest`, so no
    /// escaping is needed.
    pub fn prices_url(&self, request: &PriceRequest) -> String {
        let mut url = format!(
            "{}/{}.json?ticker={}&date.gte={}",
            self.base_url,
            self.dataset,
            request.ticker(),
            request.start().format(DATE_FORMAT)
        );
        if let Some(end) = request.end() {
            url.push_str(&format!("&date.lte={}", end.format(DATE_FORMAT)));
        }
        url.push_str("&qopts.columns=date,close");
        url
    }

    /// Map an HTTP status and body onto a response or a structured error.
    ///
    /// An API error in the body takes precedence over the status code, since
    /// the API reports most failures with both.
    fn interpret(
        symbol: &str,
        status: u16,
        retry_after: Option<u64>,
        body: &str,
    ) -> Result<RawResponse, DataError> {
        if status == 429 {
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            });
        }

        let success = (200..300).contains(&status);
        let parsed = match RawResponse::from_json_str(body) {
            Err(DataError::MalformedResponse(_)) if !success => {
                return Err(DataError::Http { status });
            }
            other => other,
        };

        match parsed {
            Err(DataError::Api { code, .. }) if NOT_FOUND_CODES.contains(&code.as_str()) => {
                Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                })
            }
            Err(e) => Err(e),
            Ok(_) if !success => Err(DataError::Http { status }),
            Ok(response) => Ok(response),
        }
    }
}

impl PriceProvider for QuandlProvider {
    fn name(&self) -> &str {
        "quandl"
    }

    fn fetch(&self, request: &PriceRequest) -> Result<RawResponse, DataError> {
        let url = self.prices_url(request);
        info!("fetching {} prices since {}", request.ticker(), request.start());
        debug!("GET {url}");

        let resp = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                DataError::NetworkUnreachable(e.to_string())
            } else {
                DataError::Transport(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = resp
            .text()
            .map_err(|e| DataError::Transport(format!("failed to read response body: {e}")))?;

        Self::interpret(request.ticker(), status, retry_after, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> QuandlProvider {
        QuandlProvider::new("https://example.test/api/v3/datatables/", "/WIKI/PRICES", DEFAULT_TIMEOUT)
            .unwrap()
    }

    #[test]
    fn url_with_start_only() {
        let req = PriceRequest::parse("aapl", "2017-08-01", None).unwrap();
        assert_eq!(
            provider().prices_url(&req),
            "https://example.test/api/v3/datatables/WIKI/PRICES.json\
             ?ticker=AAPL&date.gte=2017-08-01&qopts.columns=date,close"
        );
    }

    #[test]
    fn url_with_range() {
        let req = PriceRequest::parse("msft", "2017-01-01", Some("2017-06-30")).unwrap();
        assert!(provider()
            .prices_url(&req)
            .contains("date.gte=2017-01-01&date.lte=2017-06-30"));
    }

    #[test]
    fn ok_body_passes_through() {
        let body = r#"{"datatable":{"columns":[{"name":"date"},{"name":"close"}],"data":[["2017-08-01",150.05]]}}"#;
        let resp = QuandlProvider::interpret("AAPL", 200, None, body).unwrap();
        assert!(resp.body().get("datatable").is_some());
    }

    #[test]
    fn api_error_in_body() {
        let body = r#"{"quandl_error":{"code":"QELx01","message":"You have exceeded the anonymous user limit"}}"#;
        assert_eq!(
            QuandlProvider::interpret("AAPL", 429, Some(5), body),
            Err(DataError::RateLimited { retry_after_secs: 5 })
        );
        assert!(matches!(
            QuandlProvider::interpret("AAPL", 403, None, body),
            Err(DataError::Api { .. })
        ));
    }

    #[test]
    fn unknown_code_maps_to_symbol_not_found() {
        let body = r#"{"quandl_error":{"code":"QECx02","message":"You have submitted an incorrect Quandl code."}}"#;
        assert_eq!(
            QuandlProvider::interpret("ZZZZ", 404, None, body),
            Err(DataError::SymbolNotFound {
                symbol: "ZZZZ".into()
            })
        );
    }

    #[test]
    fn server_error_without_json() {
        assert_eq!(
            QuandlProvider::interpret("AAPL", 502, None, "<html>Bad Gateway</html>"),
            Err(DataError::Http { status: 502 })
        );
    }

    #[test]
    fn rate_limit_defaults_retry_after() {
        assert_eq!(
            QuandlProvider::interpret("AAPL", 429, None, ""),
            Err(DataError::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS
            })
        );
    }

    #[test]
    fn success_with_garbage_body_is_malformed() {
        assert!(matches!(
            QuandlProvider::interpret("AAPL", 200, None, "not json"),
            Err(DataError::MalformedResponse(_))
        ));
    }
}

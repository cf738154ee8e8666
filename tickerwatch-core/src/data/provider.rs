//! Price provider trait, raw response payload, and structured error types.
//!
//! The PriceProvider trait abstracts over where prices come from (the Quandl
//! datatables API, a canned fixture, a closure in a test) so the pipeline can
//! swap implementations and mock for tests.

use serde_json::Value;
use thiserror::Error;

use crate::domain::PriceRequest;

/// Key marking an error reported by the data API itself.
pub const API_ERROR_KEY: &str = "quandl_error";

/// Key marking an error raised on the way to the API (connection, proxy, client).
pub const TRANSPORT_ERROR_KEY: &str = "error";

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output and log lines alike.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from data provider")]
    Http { status: u16 },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),

    #[error("malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkUnreachable(_) | Self::Transport(_) | Self::RateLimited { .. } => true,
            Self::Http { status } => *status == 408 || *status >= 500,
            Self::Api { .. }
            | Self::SymbolNotFound { .. }
            | Self::MalformedResponse(_)
            | Self::MalformedRecord { .. }
            | Self::Other(_) => false,
        }
    }
}

/// Decoded response body from a price provider.
///
/// Providers build these with [`RawResponse::classify`], which turns the two
/// error-bearing body shapes into a [`DataError`] so downstream code only ever
/// sees payloads that at least claim to carry data.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    body: Value,
}

impl RawResponse {
    /// Wrap a body without inspecting it.
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Wrap a body, converting error-bearing shapes into errors.
    ///
    /// `{"quandl_error": {"code": .., "message": ..}}` becomes [`DataError::Api`];
    /// `{"error": ..}` becomes [`DataError::Transport`].
    pub fn classify(body: Value) -> Result<Self, DataError> {
        if let Some(err) = body.get(API_ERROR_KEY) {
            let field = |name: &str| {
                err.get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            return Err(DataError::Api {
                code: field("code"),
                message: field("message"),
            });
        }
        if let Some(err) = body.get(TRANSPORT_ERROR_KEY) {
            let message = match err {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(DataError::Transport(message));
        }
        Ok(Self { body })
    }

    /// Parse a JSON text body and classify it.
    pub fn from_json_str(text: &str) -> Result<Self, DataError> {
        let body: Value = serde_json::from_str(text)
            .map_err(|e| DataError::MalformedResponse(format!("body is not JSON: {e}")))?;
        Self::classify(body)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// Trait for price-history sources.
///
/// Implementations handle transport and the source's error conventions and
/// return the undecoded tabular payload; validation and reshaping happen in
/// the core, not in the provider.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the closing-price table for a request.
    fn fetch(&self, request: &PriceRequest) -> Result<RawResponse, DataError>;
}

impl<F> PriceProvider for F
where
    F: Fn(&PriceRequest) -> Result<RawResponse, DataError> + Send + Sync,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn fetch(&self, request: &PriceRequest) -> Result<RawResponse, DataError> {
        self(request)
    }
}

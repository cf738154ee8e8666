//! Data acquisition, response validation, and reshaping

pub mod provider;
pub mod quandl;
pub mod reshape;
mod table;
pub mod validate;

pub use provider::{DataError, PriceProvider, RawResponse, API_ERROR_KEY, TRANSPORT_ERROR_KEY};
pub use quandl::QuandlProvider;
pub use reshape::reshape;
pub use table::{CLOSE_FIELD, DATE_FIELD};
pub use validate::validate;

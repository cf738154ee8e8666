//! Domain types for tickerwatch

pub mod price;
pub mod request;

pub use price::{PriceError, PricePoint, PriceSeries};
pub use request::{parse_date, PriceRequest, RequestError, DATE_FORMAT};

//! Tickerwatch Core: price domain types, data providers, validation and reshaping.
//!
//! This crate contains the data side of the pipeline:
//! - Domain types (price points, ordered price series, requests)
//! - The `PriceProvider` trait and the Quandl datatables provider
//! - Response validation (error markers, table shape)
//! - Reshaping raw rows into a date-ordered closing-price series

pub mod data;
pub mod domain;

//! Price points and the ordered closing-price series built from them.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Errors constructing a price point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("close price must be finite, got {0}")]
    NonFinite(f64),
    #[error("close price must be non-negative, got {0}")]
    Negative(f64),
}

/// Closing price of a ticker on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    date: NaiveDate,
    close_price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close_price: f64) -> Result<Self, PriceError> {
        if !close_price.is_finite() {
            return Err(PriceError::NonFinite(close_price));
        }
        if close_price < 0.0 {
            return Err(PriceError::Negative(close_price));
        }
        Ok(Self { date, close_price })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn close_price(&self) -> f64 {
        self.close_price
    }
}

/// Chronologically ordered closing prices, one per date.
///
/// The only constructors sort by date and drop duplicate dates, so every
/// `PriceSeries` is strictly increasing by date. There is no way to mutate
/// a series after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points in any order.
    ///
    /// Sorting is stable, so when the input holds the same date more than
    /// once the earliest occurrence in input order is kept.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    /// Build a series of consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self, PriceError> {
        let points = start
            .iter_days()
            .zip(closes)
            .map(|(date, &close)| PricePoint::new(date, close))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_points(points))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn as_slice(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    /// Closing prices in chronological order.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close_price)
    }

    /// `(date, close)` pairs in chronological order.
    pub fn to_pairs(&self) -> Vec<(NaiveDate, f64)> {
        self.points.iter().map(|p| (p.date, p.close_price)).collect()
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

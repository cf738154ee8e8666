//! Reshaping a validated response into an ordered closing-price series.
//!
//! Upstream row order is not trusted: rows are always sorted by date. When a
//! date appears more than once, the first row carrying it wins.

use chrono::NaiveDate;
use log::debug;
use serde_json::Value;

use super::provider::{DataError, RawResponse};
use super::table::Table;
use crate::domain::{PricePoint, PriceSeries, DATE_FORMAT};

/// Convert a validated response into a [`PriceSeries`].
///
/// Call [`validate`](super::validate::validate) first. An unrecognized body
/// yields [`DataError::MalformedResponse`]; a row with a missing or
/// unparseable date or close yields [`DataError::MalformedRecord`].
pub fn reshape(response: &RawResponse) -> Result<PriceSeries, DataError> {
    let table = Table::locate(response.body())
        .ok_or_else(|| DataError::MalformedResponse("no price table in response".into()))?;

    let rows = table.rows();
    let mut points = Vec::with_capacity(rows.len());
    for (row, raw) in rows.iter().enumerate() {
        let (date, close) = table.cells(raw);
        let malformed = |reason: String| DataError::MalformedRecord { row, reason };

        let date = parse_date_cell(date).map_err(malformed)?;
        let close = parse_price_cell(close).map_err(malformed)?;
        let point = PricePoint::new(date, close).map_err(|e| malformed(e.to_string()))?;
        points.push(point);
    }

    let series = PriceSeries::from_points(points);
    if series.len() < rows.len() {
        debug!(
            "dropped {} duplicate-date rows while reshaping",
            rows.len() - series.len()
        );
    }
    Ok(series)
}

fn parse_date_cell(cell: Option<&Value>) -> Result<NaiveDate, String> {
    match cell {
        Some(Value::String(s)) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map_err(|_| format!("invalid date '{s}'")),
        Some(Value::Null) | None => Err("missing date".into()),
        Some(other) => Err(format!("date is not a string: {other}")),
    }
}

fn parse_price_cell(cell: Option<&Value>) -> Result<f64, String> {
    match cell {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("close price out of range: {n}")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("close price is not a number: '{s}'")),
        Some(Value::Null) | None => Err("missing close price".into()),
        Some(other) => Err(format!("close price is not a number: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reshape_json(body: Value) -> Result<PriceSeries, DataError> {
        reshape(&RawResponse::new(body))
    }

    #[test]
    fn reshapes_records() {
        let series = reshape_json(json!({"data": [
            {"date": "2017-01-01", "close": 31},
            {"date": "2017-02-01", "close": 34}
        ]}))
        .unwrap();
        assert_eq!(
            series.to_pairs(),
            vec![(day(2017, 1, 1), 31.0), (day(2017, 2, 1), 34.0)]
        );
    }

    #[test]
    fn reshapes_columnar_and_sorts_descending_input() {
        let series = reshape_json(json!({"datatable": {
            "columns": [{"name": "date"}, {"name": "close"}],
            "data": [["2017-01-05", 116.61], ["2017-01-04", 116.02], ["2017-01-03", 116.15]]
        }}))
        .unwrap();
        assert_eq!(
            series.to_pairs(),
            vec![
                (day(2017, 1, 3), 116.15),
                (day(2017, 1, 4), 116.02),
                (day(2017, 1, 5), 116.61),
            ]
        );
    }

    #[test]
    fn parses_string_prices() {
        let series = reshape_json(json!({"data": [{"date": "2017-01-01", "close": " 31.5 "}]})).unwrap();
        assert_eq!(series.first().unwrap().close_price(), 31.5);
    }

    #[test]
    fn first_duplicate_date_wins() {
        let series = reshape_json(json!({"data": [
            {"date": "2017-01-02", "close": 10},
            {"date": "2017-01-01", "close": 5},
            {"date": "2017-01-02", "close": 99}
        ]}))
        .unwrap();
        assert_eq!(series.to_pairs(), vec![(day(2017, 1, 1), 5.0), (day(2017, 1, 2), 10.0)]);
    }

    #[test]
    fn missing_price_is_malformed_record() {
        let err = reshape_json(json!({"data": [
            {"date": "2017-01-01", "close": 31},
            {"date": "2017-01-02"}
        ]}))
        .unwrap_err();
        assert_eq!(
            err,
            DataError::MalformedRecord {
                row: 1,
                reason: "missing close price".into()
            }
        );
    }

    #[test]
    fn unparseable_price_is_malformed_record() {
        let err = reshape_json(json!({"data": [{"date": "2017-01-01", "close": "n/a"}]})).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn negative_price_is_malformed_record() {
        let err = reshape_json(json!({"data": [{"date": "2017-01-01", "close": -3}]})).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn bad_date_is_malformed_record() {
        let err = reshape_json(json!({"data": [{"date": "01/02/2017", "close": 3}]})).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { row: 0, .. }));
        let err = reshape_json(json!({"data": [{"date": 20170102, "close": 3}]})).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn short_columnar_row_is_malformed_record() {
        let err = reshape_json(json!({"datatable": {
            "columns": ["date", "close"],
            "data": [["2017-01-03"]]
        }}))
        .unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn unrecognized_body_is_malformed_response() {
        assert!(matches!(
            reshape_json(json!({"rows": []})),
            Err(DataError::MalformedResponse(_))
        ));
    }

    #[test]
    fn reshape_is_idempotent() {
        let body = json!({"data": [
            {"date": "2017-03-01", "close": 12.5},
            {"date": "2017-01-01", "close": 10},
            {"date": "2017-02-01", "close": 11}
        ]});
        let first = reshape_json(body).unwrap();

        let rebuilt: Vec<Value> = first
            .iter()
            .map(|p| json!({"date": p.date().format(DATE_FORMAT).to_string(), "close": p.close_price()}))
            .collect();
        let second = reshape_json(json!({ "data": rebuilt })).unwrap();

        assert_eq!(first.to_pairs(), second.to_pairs());
    }
}

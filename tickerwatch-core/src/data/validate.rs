//! Response shape validation.

use super::provider::{RawResponse, API_ERROR_KEY, TRANSPORT_ERROR_KEY};
use super::table::{Table, CLOSE_FIELD, DATE_FIELD};

/// Check that a response is worth reshaping.
///
/// True only when the body carries no error marker, holds a recognizable
/// price table with date and close columns, and has at least one row.
/// Never fails: anything unexpected is simply `false`.
pub fn validate(response: &RawResponse) -> bool {
    let body = response.body();
    if body.get(API_ERROR_KEY).is_some() || body.get(TRANSPORT_ERROR_KEY).is_some() {
        return false;
    }
    let Some(table) = Table::locate(body) else {
        return false;
    };
    let Some(first) = table.rows().first() else {
        return false;
    };
    match table {
        Table::Columnar { .. } => first.is_array(),
        Table::Records { .. } => first.get(DATE_FIELD).is_some() && first.get(CLOSE_FIELD).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn valid(body: Value) -> bool {
        validate(&RawResponse::new(body))
    }

    #[test]
    fn accepts_columnar_table() {
        assert!(valid(json!({"datatable": {
            "columns": [{"name": "date", "type": "Date"}, {"name": "close", "type": "BigDecimal(34,12)"}],
            "data": [["2017-01-03", 116.15], ["2017-01-04", 116.02]]
        }})));
    }

    #[test]
    fn accepts_records_table() {
        assert!(valid(json!({"data": [
            {"date": "2017-01-01", "close": 31},
            {"date": "2017-02-01", "close": 34}
        ]})));
    }

    #[test]
    fn rejects_error_markers_even_with_data() {
        assert!(!valid(json!({
            "quandl_error": {"code": "QEPx04", "message": "bad"},
            "data": [{"date": "2017-01-01", "close": 31}]
        })));
        assert!(!valid(json!({
            "error": "timeout",
            "data": [{"date": "2017-01-01", "close": 31}]
        })));
    }

    #[test]
    fn rejects_empty_rows() {
        assert!(!valid(json!({"data": []})));
        assert!(!valid(json!({"datatable": {"columns": ["date", "close"], "data": []}})));
    }

    #[test]
    fn rejects_missing_columns() {
        assert!(!valid(json!({"data": [{"date": "2017-01-01", "open": 31}]})));
        assert!(!valid(json!({"datatable": {"columns": ["date", "open"], "data": [["2017-01-01", 1]]}})));
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert!(!valid(json!(null)));
        assert!(!valid(json!({"dataset": {}})));
        assert!(!valid(json!({"data": "nope"})));
        assert!(!valid(json!({"data": [1, 2]})));
        assert!(!valid(json!({"datatable": {"columns": ["date", "close"], "data": [1]}})));
    }
}

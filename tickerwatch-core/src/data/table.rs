//! Locating the price table inside a response body.
//!
//! Two tabular layouts are recognized:
//!
//! ```text
//! columnar: {"datatable": {"columns": [{"name": "date"}, {"name": "close"}], "data": [["2017-01-03", 116.15]]}}
//! records:  {"data": [{"date": "2017-01-03", "close": 116.15}]}
//! ```
//!
//! The columnar form is what the Quandl datatables API returns; the records
//! form is what hand-built fixtures and simpler upstreams produce.

use serde_json::Value;

pub const DATE_FIELD: &str = "date";
pub const CLOSE_FIELD: &str = "close";

/// A borrowed view of the rows of a recognized price table.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Table<'a> {
    Columnar {
        date_idx: usize,
        close_idx: usize,
        rows: &'a [Value],
    },
    Records {
        rows: &'a [Value],
    },
}

impl<'a> Table<'a> {
    /// Find the table in `body`, or `None` if the body has neither layout.
    ///
    /// A columnar table must name both the date and close columns. A records
    /// table qualifies when its rows are an array; per-row fields are checked
    /// by the caller.
    pub(crate) fn locate(body: &'a Value) -> Option<Self> {
        if let Some(table) = body.get("datatable") {
            let columns = table.get("columns")?.as_array()?;
            let rows = table.get("data")?.as_array()?;
            return Some(Self::Columnar {
                date_idx: column_index(columns, DATE_FIELD)?,
                close_idx: column_index(columns, CLOSE_FIELD)?,
                rows,
            });
        }
        let rows = body.get("data")?.as_array()?;
        Some(Self::Records { rows })
    }

    pub(crate) fn rows(&self) -> &'a [Value] {
        match self {
            Self::Columnar { rows, .. } | Self::Records { rows } => rows,
        }
    }

    /// The raw date and close cells of one row. Missing cells are `None`.
    pub(crate) fn cells(&self, row: &'a Value) -> (Option<&'a Value>, Option<&'a Value>) {
        match *self {
            Self::Columnar {
                date_idx,
                close_idx,
                ..
            } => (row.get(date_idx), row.get(close_idx)),
            Self::Records { .. } => (row.get(DATE_FIELD), row.get(CLOSE_FIELD)),
        }
    }
}

/// Columns are objects with a `name`, or bare strings.
fn column_index(columns: &[Value], name: &str) -> Option<usize> {
    columns.iter().position(|col| {
        let col_name = col.get("name").and_then(Value::as_str).or_else(|| col.as_str());
        col_name.is_some_and(|n| n.eq_ignore_ascii_case(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn locates_columnar_table() {
        let body = json!({"datatable": {
            "columns": [{"name": "ticker"}, {"name": "date"}, {"name": "close"}],
            "data": [["AAPL", "2017-01-03", 116.15]]
        }});
        let table = Table::locate(&body).unwrap();
        assert!(matches!(
            table,
            Table::Columnar {
                date_idx: 1,
                close_idx: 2,
                ..
            }
        ));
        let (date, close) = table.cells(&table.rows()[0]);
        assert_eq!(date, Some(&json!("2017-01-03")));
        assert_eq!(close, Some(&json!(116.15)));
    }

    #[test]
    fn accepts_bare_string_columns() {
        let body = json!({"datatable": {"columns": ["date", "close"], "data": []}});
        assert!(Table::locate(&body).is_some());
    }

    #[test]
    fn columnar_without_close_is_unrecognized() {
        let body = json!({"datatable": {"columns": [{"name": "date"}], "data": [["2017-01-03"]]}});
        assert!(Table::locate(&body).is_none());
    }

    #[test]
    fn locates_records_table() {
        let body = json!({"data": [{"date": "2017-01-01", "close": 31}]});
        let table = Table::locate(&body).unwrap();
        let (date, close) = table.cells(&table.rows()[0]);
        assert_eq!(date, Some(&json!("2017-01-01")));
        assert_eq!(close, Some(&json!(31)));
    }

    #[test]
    fn non_object_body_is_unrecognized() {
        assert!(Table::locate(&json!([1, 2, 3])).is_none());
        assert!(Table::locate(&json!("data")).is_none());
    }
}

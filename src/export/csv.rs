//! CSV export.

use crate::error::AlchemyResult;
use crate::types::{DataSet, Value};

/// Serialize `dataset` as CSV: header row, no index column, comma-delimited.
///
/// Fields holding the delimiter, quotes or newlines are quoted. `Null` becomes an empty
/// field, whole floats keep a trailing `.0` and booleans are written `True`/`False`.
pub fn write_csv(dataset: &DataSet) -> AlchemyResult<Vec<u8>> {
    if dataset.column_count() == 0 {
        return Ok(Vec::new());
    }

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(format_cell))?;
    }
    wtr.into_inner()
        .map_err(|e| csv::Error::from(e.into_error()).into())
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) => format_float(*v),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Utf8(s) => s.clone(),
    }
}

pub(crate) fn format_float(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

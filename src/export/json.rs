//! Line-delimited JSON export.

use crate::error::AlchemyResult;
use crate::types::{DataSet, Value};

/// Serialize `dataset` as NDJSON: one compact object per row, keys in column order, each line
/// terminated by `\n`. `Null` and non-finite floats become `null`.
pub fn write_ndjson(dataset: &DataSet) -> AlchemyResult<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    for row in &dataset.rows {
        let record: serde_json::Map<String, serde_json::Value> = dataset
            .schema
            .field_names()
            .zip(row.iter())
            .map(|(name, value)| (name.to_owned(), to_json_value(value)))
            .collect();
        serde_json::to_writer(&mut buf, &serde_json::Value::Object(record))?;
        buf.push(b'\n');
    }
    Ok(buf)
}

fn to_json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Int64(v) => serde_json::Value::from(*v),
        Value::Float64(v) => serde_json::Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Bool(v) => serde_json::Value::Bool(*v),
        Value::Utf8(s) => serde_json::Value::String(s.clone()),
    }
}

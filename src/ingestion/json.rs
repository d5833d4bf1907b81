//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object, read as one record: `{"a":1}`
//! - Line-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Nested objects are flattened into dot-path columns (e.g. `user.name`).

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use crate::error::{AlchemyError, AlchemyResult};
use crate::types::{DataSet, Value};

/// Ingest JSON from an in-memory string into a [`DataSet`].
///
/// The input is first parsed as a single JSON document. If that document is followed by more
/// data, the input is re-read as NDJSON, one record per non-blank line. Any other parse error
/// is reported as [`AlchemyError::MalformedJson`].
pub fn ingest_json_from_str(input: &str) -> AlchemyResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AlchemyError::EmptyFile);
    }

    match parse_document(trimmed) {
        Ok(serde_json::Value::Array(items)) => ingest_json_values(items),
        Ok(v @ serde_json::Value::Object(_)) => ingest_json_values(vec![v]),
        Ok(_) => Err(AlchemyError::MalformedJson {
            message: "json must be an object, an array of objects, or NDJSON".to_string(),
        }),
        Err(DocumentError::TrailingData) => {
            debug!("json document has trailing data; retrying as line-delimited json");
            ingest_ndjson_from_str(trimmed)
        }
        Err(DocumentError::Malformed(e)) => Err(AlchemyError::MalformedJson {
            message: e.to_string(),
        }),
    }
}

/// Ingest newline-delimited JSON, one object per non-blank line.
pub fn ingest_ndjson_from_str(input: &str) -> AlchemyResult<DataSet> {
    let mut values = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| AlchemyError::MalformedJson {
            message: format!("invalid ndjson at line {}: {}", i + 1, e),
        })?;
        values.push(v);
    }
    ingest_json_values(values)
}

enum DocumentError {
    TrailingData,
    Malformed(serde_json::Error),
}

fn parse_document(input: &str) -> Result<serde_json::Value, DocumentError> {
    let mut de = serde_json::Deserializer::from_str(input);
    let value = serde_json::Value::deserialize(&mut de).map_err(DocumentError::Malformed)?;
    de.end().map_err(|_| DocumentError::TrailingData)?;
    Ok(value)
}

fn ingest_json_values(values: Vec<serde_json::Value>) -> AlchemyResult<DataSet> {
    let mut columns: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let record_num = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| AlchemyError::MalformedJson {
            message: format!("record {record_num} is not a json object"),
        })?;

        let mut cells: Vec<(String, Value)> = Vec::new();
        flatten_object("", obj, &mut cells);

        let mut row = vec![Value::Null; columns.len()];
        for (name, value) in cells {
            let col = *positions.entry(name.clone()).or_insert_with(|| {
                columns.push(name);
                columns.len() - 1
            });
            if col >= row.len() {
                row.resize(col + 1, Value::Null);
            }
            row[col] = value;
        }
        rows.push(row);
    }

    for row in &mut rows {
        row.resize(columns.len(), Value::Null);
    }
    Ok(DataSet::from_rows(columns, rows))
}

fn flatten_object(
    prefix: &str,
    obj: &serde_json::Map<String, serde_json::Value>,
    out: &mut Vec<(String, Value)>,
) {
    for (key, v) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match v {
            serde_json::Value::Object(nested) => flatten_object(&path, nested, out),
            other => out.push((path, convert_json_value(other))),
        }
    }
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        // Arrays have no scalar form; keep their compact JSON text.
        serde_json::Value::Array(_) => Value::Utf8(v.to_string()),
        serde_json::Value::Object(_) => Value::Utf8(v.to_string()),
    }
}

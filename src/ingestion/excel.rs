//! Excel (`.xlsx`) ingestion implementation.

use std::io::Cursor;

use calamine::{Data, DataType as _, Reader, Xlsx};
use log::debug;

use crate::error::{AlchemyError, AlchemyResult};
use crate::types::{DataSet, Value};

use super::unique_headers;

/// Ingest the first sheet of an `.xlsx` workbook into an in-memory `DataSet`.
///
/// Behavior:
/// - Uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows and converts cells into typed `Value`s: integral numbers become
///   `Int64`, date cells become `YYYY-MM-DD HH:MM:SS` text, empty and error cells become `Null`
pub fn ingest_excel_from_bytes(bytes: &[u8]) -> AlchemyResult<DataSet> {
    let mut workbook: Xlsx<Cursor<&[u8]>> = Xlsx::new(Cursor::new(bytes))?;

    if let Some(name) = workbook.sheet_names().first() {
        debug!("reading first sheet '{name}' of workbook");
    }
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AlchemyError::EmptyOrUnparseable {
            message: "workbook has no sheets".to_string(),
        })??;

    ingest_sheet_range(&range)
}

fn ingest_sheet_range(range: &calamine::Range<Data>) -> AlchemyResult<DataSet> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| AlchemyError::EmptyOrUnparseable {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })?;

    let mut rows_iter = range.rows().skip(header_row_idx);
    let header_cells: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(cell_to_header_string).collect())
        .unwrap_or_default();
    let width = header_cells.len();
    let columns = unique_headers(header_cells);

    let rows: Vec<Vec<Value>> = rows_iter
        .map(|row| {
            (0..width)
                .map(|col| convert_cell(row.get(col).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    Ok(DataSet::from_rows(columns, rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => c
            .as_datetime()
            .map(|dt| dt.format(DATETIME_FORMAT).to_string())
            .unwrap_or_else(|| c.to_string()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => "".to_string(),
    }
}

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Whole numbers below 2^53 are stored as floats by Excel but read back as integers.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < MAX_EXACT_INT {
                Value::Int64(*f as i64)
            } else {
                Value::Float64(*f)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => c
            .as_datetime()
            .map(|parsed| Value::Utf8(parsed.format(DATETIME_FORMAT).to_string()))
            .unwrap_or(Value::Float64(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
    }
}

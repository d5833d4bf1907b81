//! CSV ingestion implementation.

use log::debug;

use crate::error::{AlchemyError, AlchemyResult};
use crate::types::{DataSet, Value};

use super::unique_headers;

/// Cell texts treated as missing values.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Ingest CSV text into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The first record is the header row.
/// - Records whose field count differs from the header are skipped.
/// - If the header yields no columns, the input is re-read once without a header, using
///   positional column names (`"0"`, `"1"`, ...). The reader skips blank lines, so an empty
///   header means the input held no records at all and the retry comes back empty too; that
///   case is [`AlchemyError::EmptyOrUnparseable`].
/// - Column types are inferred from the cell text (see [`ingest_csv_from_reader`]).
pub fn ingest_csv_from_str(input: &str) -> AlchemyResult<DataSet> {
    let ds = ingest_csv_from_reader(&mut reader_for(input, true))?;
    if ds.column_count() > 0 {
        return Ok(ds);
    }

    debug!("csv header yielded no columns; retrying without a header row");
    let ds = ingest_csv_from_reader(&mut reader_for(input, false))?;
    if ds.column_count() == 0 {
        return Err(AlchemyError::EmptyOrUnparseable {
            message: "csv input has no columns, with or without a header row".to_string(),
        });
    }
    Ok(ds)
}

fn reader_for(input: &str, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(input.as_bytes())
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader should be `flexible` so that short or long records reach the row filter instead
/// of aborting the parse. Per column, over the non-missing cells (see [`NA_TOKENS`]):
///
/// - all integers → `Int64`
/// - all numbers → `Float64`
/// - all `true`/`false` (any case) → `Bool`
/// - otherwise the text is kept verbatim as `Utf8`
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> AlchemyResult<DataSet> {
    let has_headers = rdr.has_headers();
    let headers = rdr.headers()?.clone();
    let width = headers.len();
    if width == 0 {
        return Ok(DataSet::default());
    }

    let columns = if has_headers {
        unique_headers(headers.iter())
    } else {
        (0..width).map(|i| i.to_string()).collect()
    };

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    let mut skipped = 0usize;
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based line number for diagnostics; the header occupies line 1.
        let user_row = row_idx0 + if has_headers { 2 } else { 1 };
        let record = match result {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(err.into()),
            Err(err) => {
                debug!("skipping unreadable csv row {user_row}: {err}");
                skipped += 1;
                continue;
            }
        };
        if record.len() != width {
            debug!(
                "skipping csv row {user_row}: expected {width} fields, found {}",
                record.len()
            );
            skipped += 1;
            continue;
        }
        raw_rows.push(record.iter().map(str::to_owned).collect());
    }
    if skipped > 0 {
        debug!("skipped {skipped} malformed csv row(s)");
    }

    let kinds: Vec<CellKind> = (0..width).map(|idx| column_kind(&raw_rows, idx)).collect();
    let rows = raw_rows
        .into_iter()
        .map(|raw| {
            raw.into_iter()
                .zip(kinds.iter())
                .map(|(cell, kind)| typed_value(cell, *kind))
                .collect()
        })
        .collect();

    Ok(DataSet::from_rows(columns, rows))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Bool,
    Text,
}

fn is_missing(raw: &str) -> bool {
    raw.trim().is_empty() || NA_TOKENS.contains(&raw)
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn column_kind(rows: &[Vec<String>], idx: usize) -> CellKind {
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for raw in rows.iter().filter_map(|r| r.get(idx)) {
        if is_missing(raw) {
            continue;
        }
        let trimmed = raw.trim();
        all_int &= trimmed.parse::<i64>().is_ok();
        all_float &= trimmed.parse::<f64>().is_ok();
        all_bool &= parse_bool(trimmed).is_some();
        if !(all_int || all_float || all_bool) {
            return CellKind::Text;
        }
    }

    if all_int {
        CellKind::Int
    } else if all_float {
        CellKind::Float
    } else if all_bool {
        CellKind::Bool
    } else {
        CellKind::Text
    }
}

fn typed_value(raw: String, kind: CellKind) -> Value {
    if is_missing(&raw) {
        return Value::Null;
    }
    let trimmed = raw.trim();
    match kind {
        CellKind::Int => trimmed.parse::<i64>().map(Value::Int64).unwrap_or(Value::Null),
        CellKind::Float => trimmed.parse::<f64>().map(Value::Float64).unwrap_or(Value::Null),
        CellKind::Bool => parse_bool(trimmed).map(Value::Bool).unwrap_or(Value::Null),
        CellKind::Text => Value::Utf8(raw),
    }
}

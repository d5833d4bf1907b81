//! Cleaning operations for [`crate::types::DataSet`]: de-duplication and mean imputation.

use std::collections::HashSet;

use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] without rows that exactly repeat an earlier row.
///
/// Rows are compared across all columns; `Null` equals `Null`. The first occurrence of each
/// row survives and survivors keep their original order, so applying this twice is the same
/// as applying it once.
pub fn deduplicate(dataset: &DataSet) -> DataSet {
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(dataset.row_count());
    let mut rows = Vec::new();
    for row in &dataset.rows {
        if seen.insert(row.iter().map(CellKey::from).collect()) {
            rows.push(row.clone());
        }
    }

    DataSet::new(dataset.schema.clone(), rows)
}

/// Hashable view of a [`Value`]; floats compare by bit pattern with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> From<&'a Value> for CellKey<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Int64(v) => Self::Int(*v),
            Value::Float64(v) => Self::Float(if *v == 0.0 { 0 } else { v.to_bits() }),
            Value::Bool(v) => Self::Bool(*v),
            Value::Utf8(s) => Self::Text(s.as_str()),
        }
    }
}

/// Returns a new [`DataSet`] with missing numeric values replaced by their column mean.
///
/// - Each numeric column's mean is computed over its own non-missing values.
/// - A filled `Int64` column becomes `Float64`.
/// - Numeric columns without any non-missing value stay missing.
/// - Non-numeric columns are untouched.
pub fn fill_missing_numeric(dataset: &DataSet) -> DataSet {
    let means: Vec<Option<f64>> = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            if field.data_type.is_numeric() {
                column_mean(dataset, idx)
            } else {
                None
            }
        })
        .collect();

    if means.iter().all(Option::is_none) {
        return dataset.clone();
    }

    dataset.map_rows(|row| {
        row.iter()
            .zip(means.iter())
            .map(|(value, mean)| match (value, mean) {
                (Value::Null, Some(m)) => Value::Float64(*m),
                _ => value.clone(),
            })
            .collect()
    })
}

fn column_mean(dataset: &DataSet, idx: usize) -> Option<f64> {
    let (sum, count) = dataset
        .column_values(idx)
        .filter_map(Value::as_f64)
        .fold((0.0_f64, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

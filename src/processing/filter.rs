//! Row filtering for [`crate::types::DataSet`].

use std::collections::BTreeMap;

use crate::error::{AlchemyError, AlchemyResult};
use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// Inclusive numeric range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `true` if `v` lies within the range, bounds included.
    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Keep rows whose values fall inside every range in `ranges`.
///
/// - Columns absent from `ranges` impose no constraint; an empty map returns an equal dataset.
/// - A missing value never satisfies a range.
/// - Referencing a column that does not exist returns [`AlchemyError::UnknownColumn`]; a
///   non-numeric column returns [`AlchemyError::NonNumericColumn`].
pub fn filter_ranges(
    dataset: &DataSet,
    ranges: &BTreeMap<String, NumericRange>,
) -> AlchemyResult<DataSet> {
    if ranges.is_empty() {
        return Ok(dataset.clone());
    }

    let mut constraints: Vec<(usize, NumericRange)> = Vec::with_capacity(ranges.len());
    for (column, range) in ranges {
        let idx = dataset
            .schema
            .index_of(column)
            .ok_or_else(|| AlchemyError::UnknownColumn {
                column: column.clone(),
            })?;
        if !dataset.schema.fields[idx].data_type.is_numeric() {
            return Err(AlchemyError::NonNumericColumn {
                column: column.clone(),
            });
        }
        constraints.push((idx, *range));
    }

    Ok(filter(dataset, |row| {
        constraints.iter().all(|(idx, range)| {
            row.get(*idx)
                .and_then(Value::as_f64)
                .is_some_and(|v| range.contains(v))
        })
    }))
}

/// Observed bounds of a numeric column: the default range a caller offers for filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBounds {
    pub column: String,
    /// `None` when the column has no non-missing values.
    pub range: Option<NumericRange>,
}

impl ColumnBounds {
    /// A range can only be adjusted when the column holds at least two distinct values.
    pub fn is_adjustable(&self) -> bool {
        self.range.is_some_and(|r| r.min < r.max)
    }
}

/// Observed `[min, max]` of every numeric column, in column order.
pub fn numeric_bounds(dataset: &DataSet) -> Vec<ColumnBounds> {
    dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.data_type.is_numeric())
        .map(|(idx, field)| {
            let range = dataset
                .column_values(idx)
                .filter_map(Value::as_f64)
                .fold(None, |acc: Option<NumericRange>, v| {
                    Some(match acc {
                        Some(r) => NumericRange::new(r.min.min(v), r.max.max(v)),
                        None => NumericRange::new(v, v),
                    })
                });
            ColumnBounds {
                column: field.name.clone(),
                range,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{filter, filter_ranges, numeric_bounds, NumericRange};
    use crate::error::AlchemyError;
    use crate::types::{DataSet, Value};

    fn sample_dataset() -> DataSet {
        DataSet::from_rows(
            vec!["id".to_string(), "score".to_string(), "name".to_string(), "flat".to_string()],
            vec![
                vec![Value::Int64(1), Value::Float64(10.0), Value::Utf8("a".to_string()), Value::Int64(7)],
                vec![Value::Int64(2), Value::Float64(20.0), Value::Utf8("b".to_string()), Value::Int64(7)],
                vec![Value::Int64(3), Value::Null, Value::Utf8("c".to_string()), Value::Int64(7)],
                vec![Value::Int64(4), Value::Float64(40.0), Value::Utf8("d".to_string()), Value::Int64(7)],
            ],
        )
    }

    fn ranges(items: &[(&str, f64, f64)]) -> BTreeMap<String, NumericRange> {
        items
            .iter()
            .map(|(c, lo, hi)| (c.to_string(), NumericRange::new(*lo, *hi)))
            .collect()
    }

    #[test]
    fn filter_rows_by_predicate() {
        let ds = sample_dataset();
        let out = filter(&ds, |row| matches!(row.first(), Some(Value::Int64(v)) if *v > 2));
        assert_eq!(out.row_count(), 2);
        assert_eq!(ds.row_count(), 4);
    }

    #[test]
    fn filter_ranges_is_inclusive_conjunction() {
        let ds = sample_dataset();
        let out = filter_ranges(&ds, &ranges(&[("id", 2.0, 4.0), ("score", 10.0, 20.0)])).unwrap();
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows[0][0], Value::Int64(2));
    }

    #[test]
    fn filter_ranges_drops_missing_values() {
        let ds = sample_dataset();
        let out = filter_ranges(&ds, &ranges(&[("score", f64::MIN, f64::MAX)])).unwrap();
        assert_eq!(out.row_count(), 3);
        assert!(out.rows.iter().all(|r| !r[1].is_null()));
    }

    #[test]
    fn filter_ranges_with_no_ranges_returns_input() {
        let ds = sample_dataset();
        assert_eq!(filter_ranges(&ds, &BTreeMap::new()).unwrap(), ds);
    }

    #[test]
    fn filter_ranges_rejects_unknown_and_text_columns() {
        let ds = sample_dataset();
        let err = filter_ranges(&ds, &ranges(&[("nope", 0.0, 1.0)])).unwrap_err();
        assert!(matches!(err, AlchemyError::UnknownColumn { .. }));
        let err = filter_ranges(&ds, &ranges(&[("name", 0.0, 1.0)])).unwrap_err();
        assert!(matches!(err, AlchemyError::NonNumericColumn { .. }));
    }

    #[test]
    fn numeric_bounds_flags_constant_columns() {
        let bounds = numeric_bounds(&sample_dataset());
        let names: Vec<&str> = bounds.iter().map(|b| b.column.as_str()).collect();
        assert_eq!(names, vec!["id", "score", "flat"]);

        assert_eq!(bounds[1].range, Some(NumericRange::new(10.0, 40.0)));
        assert!(bounds[1].is_adjustable());
        assert_eq!(bounds[2].range, Some(NumericRange::new(7.0, 7.0)));
        assert!(!bounds[2].is_adjustable());
    }
}

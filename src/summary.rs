//! Descriptive statistics for the numeric columns of a [`DataSet`].
//!
//! [`summarize`] computes one [`ColumnStatistics`] per numeric column and [`render_text`]
//! lays them out as a fixed-format table. That text is also the payload handed to a
//! [`crate::suggestion::SuggestionService`].

use std::fmt;

use serde::Serialize;

use crate::types::{DataSet, Value};

/// Statistics of one numeric column, computed over its non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub column: String,
    /// Number of non-missing values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator); `None` below two values.
    pub std: Option<f64>,
    /// Population standard deviation (n denominator).
    pub population_std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Non-fatal conditions reported alongside an empty statistics set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryWarning {
    /// The dataset has no columns at all (e.g. an empty projection).
    NoColumns,
    /// The dataset has columns, none of them numeric.
    NoNumericColumns,
}

impl fmt::Display for SummaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoColumns => f.write_str("No columns to summarize."),
            Self::NoNumericColumns => f.write_str("No numeric columns to summarize."),
        }
    }
}

/// Result of [`summarize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub columns: Vec<ColumnStatistics>,
    pub warning: Option<SummaryWarning>,
}

/// Compute [`ColumnStatistics`] for every numeric column, in column order.
pub fn summarize(dataset: &DataSet) -> Summary {
    if dataset.column_count() == 0 {
        return Summary {
            columns: Vec::new(),
            warning: Some(SummaryWarning::NoColumns),
        };
    }

    let columns: Vec<ColumnStatistics> = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.data_type.is_numeric())
        .map(|(idx, field)| {
            let values: Vec<f64> = dataset.column_values(idx).filter_map(Value::as_f64).collect();
            column_statistics(&field.name, values)
        })
        .collect();

    let warning = columns.is_empty().then_some(SummaryWarning::NoNumericColumns);
    Summary { columns, warning }
}

fn column_statistics(column: &str, mut values: Vec<f64>) -> ColumnStatistics {
    values.sort_by(f64::total_cmp);
    let n = values.len();

    let mean = (n > 0).then(|| values.iter().sum::<f64>() / n as f64);
    let sum_sq = mean.map(|m| values.iter().map(|v| (v - m).powi(2)).sum::<f64>());

    ColumnStatistics {
        column: column.to_owned(),
        count: n,
        mean,
        std: sum_sq.filter(|_| n > 1).map(|s| (s / (n - 1) as f64).sqrt()),
        population_std: sum_sq.map(|s| (s / n as f64).sqrt()),
        min: values.first().copied(),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied(),
    }
}

/// Linear-interpolated quantile of an already sorted slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Render a [`Summary`] as a fixed-format text table.
///
/// One line per statistic, one right-aligned column per numeric column, six decimals, `NaN`
/// for undefined values. A summary without statistics renders its warning instead.
///
/// ```text
///               a         b
/// count  2.000000  3.000000
/// mean   1.000000  2.666667
/// ...
/// ```
pub fn render_text(summary: &Summary) -> String {
    if summary.columns.is_empty() {
        return summary
            .warning
            .unwrap_or(SummaryWarning::NoNumericColumns)
            .to_string();
    }

    let cells: Vec<Vec<String>> = summary
        .columns
        .iter()
        .map(|s| {
            [
                Some(s.count as f64),
                s.mean,
                s.std,
                s.min,
                s.q25,
                s.median,
                s.q75,
                s.max,
            ]
            .iter()
            .map(|v| format_stat(*v))
            .collect()
        })
        .collect();

    let label_width = STAT_LABELS.iter().map(|l| l.len()).max().unwrap_or(0);
    let widths: Vec<usize> = summary
        .columns
        .iter()
        .zip(cells.iter())
        .map(|(s, col)| col.iter().map(String::len).chain([s.column.len()]).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(label_width));
    for (s, w) in summary.columns.iter().zip(widths.iter()) {
        out.push_str(&format!("  {:>w$}", s.column, w = *w));
    }
    for (row, label) in STAT_LABELS.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{label:<label_width$}"));
        for (col, w) in cells.iter().zip(widths.iter()) {
            out.push_str(&format!("  {:>w$}", col[row], w = *w));
        }
    }
    out
}

fn format_stat(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        Some(v) if v.is_infinite() => if v > 0.0 { "inf" } else { "-inf" }.to_string(),
        _ => "NaN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{render_text, summarize, SummaryWarning};
    use crate::types::{DataSet, Value};

    fn sample_dataset() -> DataSet {
        DataSet::from_rows(
            vec!["a".to_string(), "b".to_string(), "name".to_string()],
            vec![
                vec![Value::Int64(1), Value::Int64(2), Value::Utf8("x".to_string())],
                vec![Value::Int64(1), Value::Int64(2), Value::Utf8("y".to_string())],
                vec![Value::Null, Value::Int64(4), Value::Utf8("z".to_string())],
            ],
        )
    }

    #[test]
    fn summarize_numeric_columns_only() {
        let summary = summarize(&sample_dataset());
        assert_eq!(summary.warning, None);
        assert_eq!(summary.columns.len(), 2);

        let a = &summary.columns[0];
        assert_eq!(a.column, "a");
        assert_eq!(a.count, 2);
        assert_eq!(a.mean, Some(1.0));
        assert_eq!(a.std, Some(0.0));

        let b = &summary.columns[1];
        assert_eq!(b.count, 3);
        assert_eq!(b.min, Some(2.0));
        assert_eq!(b.q25, Some(2.0));
        assert_eq!(b.median, Some(2.0));
        assert_eq!(b.q75, Some(3.0));
        assert_eq!(b.max, Some(4.0));
        let std = b.std.unwrap();
        assert!((std - (4.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        let pop = b.population_std.unwrap();
        assert!((pop - (8.0_f64 / 9.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_undefined_sample_std() {
        let ds = DataSet::from_rows(vec!["x".to_string()], vec![vec![Value::Float64(2.5)]]);
        let s = &summarize(&ds).columns[0];
        assert_eq!(s.std, None);
        assert_eq!(s.population_std, Some(0.0));
        assert_eq!(s.median, Some(2.5));
    }

    #[test]
    fn zero_columns_warns_instead_of_failing() {
        let summary = summarize(&DataSet::default());
        assert!(summary.columns.is_empty());
        assert_eq!(summary.warning, Some(SummaryWarning::NoColumns));
        assert_eq!(render_text(&summary), "No columns to summarize.");
    }

    #[test]
    fn text_only_dataset_warns_no_numeric_columns() {
        let ds = DataSet::from_rows(vec!["name".to_string()], vec![vec![Value::Utf8("a".to_string())]]);
        let summary = summarize(&ds);
        assert_eq!(summary.warning, Some(SummaryWarning::NoNumericColumns));
    }

    #[test]
    fn render_text_is_a_fixed_table() {
        let text = render_text(&summarize(&sample_dataset()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "              a         b");
        assert_eq!(lines[1], "count  2.000000  3.000000");
        assert_eq!(lines[2], "mean   1.000000  2.666667");
        assert_eq!(lines[3], "std    0.000000  1.154701");
        assert_eq!(lines[8], "max    1.000000  4.000000");
    }

    #[test]
    fn render_text_marks_undefined_as_nan() {
        let ds = DataSet::from_rows(vec!["empty".to_string()], vec![vec![Value::Null]]);
        let text = render_text(&summarize(&ds));
        assert!(text.contains("count  0.000000"));
        assert!(text.contains("mean        NaN"));
    }
}

use std::collections::BTreeMap;

use proptest::prelude::*;

use data_alchemy::export::{write, ExportFormat};
use data_alchemy::ingestion::read;
use data_alchemy::processing::{deduplicate, fill_missing_numeric, filter_ranges, project, NumericRange};
use data_alchemy::types::{DataSet, Value};

const COLUMNS: [&str; 4] = ["id", "score", "ok", "label"];

fn names() -> Vec<String> {
    COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn csv_row() -> impl Strategy<Value = Vec<Value>> {
    (
        prop::option::of(any::<i64>()),
        prop::option::of(-1.0e6..1.0e6f64),
        prop::option::of(any::<bool>()),
        prop::option::of("v[a-z ,\"]{0,6}"),
    )
        .prop_map(|(id, score, ok, label)| {
            vec![
                id.map(Value::Int64).unwrap_or(Value::Null),
                score.map(Value::Float64).unwrap_or(Value::Null),
                ok.map(Value::Bool).unwrap_or(Value::Null),
                label.map(Value::Utf8).unwrap_or(Value::Null),
            ]
        })
}

fn small_numeric_dataset() -> impl Strategy<Value = DataSet> {
    prop::collection::vec(
        prop::collection::vec(prop::option::of(0i64..4), 3),
        0..12,
    )
    .prop_map(|rows| {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.map(Value::Int64).unwrap_or(Value::Null)).collect())
            .collect();
        DataSet::from_rows(vec!["a".to_string(), "b".to_string(), "c".to_string()], rows)
    })
}

proptest! {
    #[test]
    fn csv_write_then_read_reproduces_rows(rows in prop::collection::vec(csv_row(), 1..10)) {
        let ds = DataSet::from_rows(names(), rows);
        let out = write(&ds, ExportFormat::Csv, "d.csv").unwrap();
        let back = read("d.csv", &out.bytes).unwrap();

        prop_assert_eq!(back.column_names(), ds.column_names());
        prop_assert_eq!(back.rows, ds.rows);
    }

    #[test]
    fn deduplicate_is_idempotent(ds in small_numeric_dataset()) {
        let once = deduplicate(&ds);
        prop_assert_eq!(deduplicate(&once), once.clone());
        prop_assert!(once.row_count() <= ds.row_count());
    }

    #[test]
    fn fill_leaves_only_all_missing_columns_missing(ds in small_numeric_dataset()) {
        let filled = fill_missing_numeric(&ds);
        prop_assert_eq!(filled.row_count(), ds.row_count());
        for idx in 0..ds.column_count() {
            let had_value = ds.column_values(idx).any(|v| !v.is_null());
            let nulls = filled.column_values(idx).filter(|v| v.is_null()).count();
            if had_value {
                prop_assert_eq!(nulls, 0);
            } else {
                prop_assert_eq!(nulls, ds.row_count());
            }
        }
    }

    #[test]
    fn filtered_rows_satisfy_every_range(
        ds in small_numeric_dataset(),
        a in (0i64..4, 0i64..4),
        c in (0i64..4, 0i64..4),
    ) {
        let ranges = BTreeMap::from([
            ("a".to_string(), NumericRange::new(a.0.min(a.1) as f64, a.0.max(a.1) as f64)),
            ("c".to_string(), NumericRange::new(c.0.min(c.1) as f64, c.0.max(c.1) as f64)),
        ]);
        let out = filter_ranges(&ds, &ranges).unwrap();
        for row in &out.rows {
            for (col, range) in &ranges {
                let idx = out.schema.index_of(col).unwrap();
                let v = row[idx].as_f64().unwrap();
                prop_assert!(range.min <= v && v <= range.max);
            }
        }
        prop_assert_eq!(filter_ranges(&ds, &BTreeMap::new()).unwrap(), ds);
    }

    #[test]
    fn projection_keeps_rows_and_requested_order(
        ds in small_numeric_dataset(),
        cols in Just(vec!["a", "b", "c"]).prop_shuffle(),
        take in 0usize..=3,
    ) {
        let selected = &cols[..take];
        let out = project(&ds, selected).unwrap();
        prop_assert_eq!(out.row_count(), ds.row_count());
        prop_assert_eq!(out.column_names(), selected.to_vec());
    }
}

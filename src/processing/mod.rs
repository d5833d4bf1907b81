//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//! Every operation takes the dataset by reference and returns a new one, so an unfiltered
//! preview stays valid while filtered or cleaned versions are derived from it.
//!
//! Currently implemented:
//!
//! - [`deduplicate()`]: drop exact duplicate rows
//! - [`fill_missing_numeric()`]: mean imputation for numeric columns
//! - [`project()`]: column selection and ordering
//! - [`filter_ranges()`]: inclusive numeric range filter, conjunctive across columns
//! - [`filter()`]: row filtering by predicate
//!
//! ## Example: clean → project → filter
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use data_alchemy::processing::{deduplicate, fill_missing_numeric, filter_ranges, project, NumericRange};
//! use data_alchemy::types::{DataSet, Value};
//!
//! let ds = DataSet::from_rows(
//!     vec!["a".to_string(), "b".to_string()],
//!     vec![
//!         vec![Value::Int64(1), Value::Int64(2)],
//!         vec![Value::Int64(1), Value::Int64(2)],
//!         vec![Value::Null, Value::Int64(4)],
//!     ],
//! );
//!
//! let cleaned = fill_missing_numeric(&deduplicate(&ds));
//! assert_eq!(cleaned.rows[1][0], Value::Float64(1.0));
//!
//! let only_b = project(&cleaned, &["b"]).unwrap();
//! let mut ranges = BTreeMap::new();
//! ranges.insert("b".to_string(), NumericRange::new(3.0, 5.0));
//! let filtered = filter_ranges(&only_b, &ranges).unwrap();
//! assert_eq!(filtered.row_count(), 1);
//! ```

pub mod cleaning;
pub mod filter;
pub mod projection;

pub use cleaning::{deduplicate, fill_missing_numeric};
pub use filter::{filter, filter_ranges, numeric_bounds, ColumnBounds, NumericRange};
pub use projection::project;

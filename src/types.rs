//! Core data model types.
//!
//! Every reader produces an in-memory [`DataSet`]: a [`Schema`] (a list of named, typed
//! [`Field`]s) plus row-major [`Value`] cells. Column types are inferred from the cells, never
//! declared by the caller.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Logical data type of a column, inferred from its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Text cells that all parse as a date or date-time.
    DateTime,
}

impl DataType {
    /// Returns `true` for [`DataType::Int64`] and [`DataType::Float64`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Infer a schema for `names` from `rows`, widening cells where the column type requires it.
    ///
    /// Per column, over its non-null cells:
    ///
    /// - all `Int64` → [`DataType::Int64`]
    /// - all numeric (mixed `Int64`/`Float64`) → [`DataType::Float64`]; `Int64` cells are
    ///   rewritten as `Float64`
    /// - all `Bool` → [`DataType::Bool`]
    /// - all `Utf8` parsing as dates → [`DataType::DateTime`]
    /// - otherwise [`DataType::Utf8`]
    ///
    /// A column with no non-null cells is [`DataType::Float64`].
    pub fn infer(names: Vec<String>, rows: &mut [Vec<Value>]) -> Self {
        let fields = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let data_type = infer_column_type(rows, idx);
                if data_type == DataType::Float64 {
                    for cell in rows.iter_mut().filter_map(|r| r.get_mut(idx)) {
                        if let Value::Int64(v) = *cell {
                            *cell = Value::Float64(v as f64);
                        }
                    }
                }
                Field::new(name, data_type)
            })
            .collect();
        Self { fields }
    }
}

fn infer_column_type(rows: &[Vec<Value>], idx: usize) -> DataType {
    let mut ints = 0usize;
    let mut floats = 0usize;
    let mut bools = 0usize;
    let mut dates = 0usize;
    let mut texts = 0usize;

    for value in rows.iter().filter_map(|r| r.get(idx)) {
        match value {
            Value::Null => {}
            Value::Int64(_) => ints += 1,
            Value::Float64(_) => floats += 1,
            Value::Bool(_) => bools += 1,
            Value::Utf8(s) => {
                texts += 1;
                if looks_like_datetime(s) {
                    dates += 1;
                }
            }
        }
    }

    let non_null = ints + floats + bools + texts;
    if non_null == 0 {
        DataType::Float64
    } else if ints == non_null {
        DataType::Int64
    } else if ints + floats == non_null {
        DataType::Float64
    } else if bools == non_null {
        DataType::Bool
    } else if texts == non_null && dates == texts {
        DataType::DateTime
    } else {
        DataType::Utf8
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Returns `true` if `s` parses as an ISO-like date, date-time or RFC 3339 timestamp.
pub fn looks_like_datetime(s: &str) -> bool {
    let s = s.trim();
    if s.len() < 8 {
        return false;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || DateTime::parse_from_rfc3339(s).is_ok()
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value; `None` for null and non-numeric cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. Every
/// transformation returns a new dataset; the receiver is never modified.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Create a dataset from column names and rows, inferring the schema.
    ///
    /// See [`Schema::infer`] for the inference rules.
    pub fn from_rows(columns: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        let schema = Schema::infer(columns, &mut rows);
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Iterate the values of the column at `idx`, one per row.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// The first `n` rows (fewer if the dataset is shorter), with the same schema.
    pub fn head(&self, n: usize) -> Self {
        Self::new(self.schema.clone(), self.rows.iter().take(n).cloned().collect())
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The schema of the result is re-inferred from the surviving rows; a column left without
    /// any values keeps its input type.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        self.reinfer(rows)
    }

    /// Create a new dataset by applying `mapper` to every row.
    ///
    /// The schema of the result is re-inferred from the mapped rows; a column left without any
    /// values keeps its input type.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        self.reinfer(rows)
    }

    fn reinfer(&self, rows: Vec<Vec<Value>>) -> Self {
        let mut out = Self::from_rows(self.column_names(), rows);
        for (idx, (field, input)) in out
            .schema
            .fields
            .iter_mut()
            .zip(self.schema.fields.iter())
            .enumerate()
        {
            if out.rows.iter().all(|row| row.get(idx).is_none_or(Value::is_null)) {
                field.data_type = input.data_type;
            }
        }
        out
    }
}

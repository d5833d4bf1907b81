//! Column projection for [`crate::types::DataSet`].

use crate::error::{AlchemyError, AlchemyResult};
use crate::types::{DataSet, Schema};

/// Returns a new [`DataSet`] holding exactly `columns`, in the given order.
///
/// - Every name must exist, otherwise [`AlchemyError::UnknownColumn`] is returned.
/// - Names must be distinct, otherwise [`AlchemyError::DuplicateColumn`] is returned.
/// - The row count never changes; an empty selection yields a zero-column dataset with the
///   same number of (empty) rows.
/// - Field types are carried over from the input schema.
pub fn project<S: AsRef<str>>(dataset: &DataSet, columns: &[S]) -> AlchemyResult<DataSet> {
    let mut idxs: Vec<usize> = Vec::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        let idx = dataset
            .schema
            .index_of(name)
            .ok_or_else(|| AlchemyError::UnknownColumn {
                column: name.to_owned(),
            })?;
        if idxs.contains(&idx) {
            return Err(AlchemyError::DuplicateColumn {
                column: name.to_owned(),
            });
        }
        idxs.push(idx);
    }

    let schema = Schema::new(idxs.iter().map(|&i| dataset.schema.fields[i].clone()).collect());
    let rows = dataset
        .rows
        .iter()
        .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(DataSet::new(schema, rows))
}

//! Excel (`.xlsx`) export.

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::error::AlchemyResult;
use crate::types::{DataSet, Value};

/// Serialize `dataset` as a single-sheet workbook (`Sheet1`) with a header row and no index
/// column. Missing values and NaN are left as blank cells.
pub fn write_excel(dataset: &DataSet) -> AlchemyResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (col, name) in dataset.schema.field_names().enumerate() {
        worksheet.write_string(0, column_number(col)?, name)?;
    }

    for (row_idx0, row) in dataset.rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx0 + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, value) in row.iter().enumerate() {
            let col = column_number(col)?;
            match value {
                Value::Null => {}
                Value::Int64(v) => {
                    worksheet.write_number(row_num, col, *v as f64)?;
                }
                Value::Float64(v) if v.is_nan() => {}
                Value::Float64(v) if v.is_infinite() => {
                    worksheet.write_string(row_num, col, if *v > 0.0 { "inf" } else { "-inf" })?;
                }
                Value::Float64(v) => {
                    worksheet.write_number(row_num, col, *v)?;
                }
                Value::Bool(v) => {
                    worksheet.write_boolean(row_num, col, *v)?;
                }
                Value::Utf8(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_number(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

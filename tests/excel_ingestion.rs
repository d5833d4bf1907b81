use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use data_alchemy::ingestion::excel::ingest_excel_from_bytes;
use data_alchemy::types::{DataType, Value};
use data_alchemy::AlchemyError;

fn people_xlsx(leading_blank_rows: u32) -> Vec<u8> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("People").unwrap();

    let top = leading_blank_rows;
    ws.write_string(top, 0, "id").unwrap();
    ws.write_string(top, 1, "name").unwrap();
    ws.write_string(top, 2, "score").unwrap();
    ws.write_string(top, 3, "active").unwrap();

    ws.write_number(top + 1, 0, 1).unwrap();
    ws.write_string(top + 1, 1, "Ada").unwrap();
    ws.write_number(top + 1, 2, 98.5).unwrap();
    ws.write_boolean(top + 1, 3, true).unwrap();

    ws.write_number(top + 2, 0, 2).unwrap();
    ws.write_string(top + 2, 1, "Grace").unwrap();
    // score left blank
    ws.write_boolean(top + 2, 3, false).unwrap();

    wb.save_to_buffer().unwrap()
}

#[test]
fn ingest_excel_reads_first_sheet_with_types() {
    let ds = ingest_excel_from_bytes(&people_xlsx(0)).unwrap();

    assert_eq!(ds.column_names(), vec!["id", "name", "score", "active"]);
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
    assert_eq!(ds.schema.fields[3].data_type, DataType::Bool);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
    assert_eq!(ds.rows[1][2], Value::Null);
}

#[test]
fn ingest_excel_uses_first_non_empty_row_as_header() {
    let ds = ingest_excel_from_bytes(&people_xlsx(2)).unwrap();
    assert_eq!(ds.column_names(), vec!["id", "name", "score", "active"]);
    assert_eq!(ds.row_count(), 2);
}

#[test]
fn ingest_excel_ignores_later_sheets() {
    let mut wb = Workbook::new();
    let first = wb.add_worksheet();
    first.write_string(0, 0, "x").unwrap();
    first.write_number(1, 0, 10).unwrap();
    let second = wb.add_worksheet();
    second.write_string(0, 0, "y").unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let ds = ingest_excel_from_bytes(&bytes).unwrap();
    assert_eq!(ds.column_names(), vec!["x"]);
    assert_eq!(ds.rows, vec![vec![Value::Int64(10)]]);
}

#[test]
fn ingest_excel_formats_date_cells_as_text() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let when = ExcelDateTime::from_ymd(2024, 3, 9).unwrap();
    ws.write_string(0, 0, "when").unwrap();
    ws.write_datetime_with_format(1, 0, &when, &date_format).unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let ds = ingest_excel_from_bytes(&bytes).unwrap();
    assert_eq!(ds.rows[0][0], Value::Utf8("2024-03-09 00:00:00".to_string()));
    assert_eq!(ds.schema.fields[0].data_type, DataType::DateTime);
}

#[test]
fn ingest_excel_rejects_empty_sheet() {
    let mut wb = Workbook::new();
    wb.add_worksheet();
    let bytes = wb.save_to_buffer().unwrap();

    let err = ingest_excel_from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, AlchemyError::EmptyOrUnparseable { .. }));
}

#[test]
fn ingest_excel_rejects_non_workbook_bytes() {
    let err = ingest_excel_from_bytes(b"not a zip archive").unwrap_err();
    assert!(matches!(err, AlchemyError::Excel(_)));
}

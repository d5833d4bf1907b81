use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

use data_alchemy::export::{output_file_name, write, ExportFormat};
use data_alchemy::ingestion::read;
use data_alchemy::types::{DataSet, Value};
use data_alchemy::AlchemyError;

fn mixed_dataset() -> DataSet {
    DataSet::from_rows(
        vec!["id".to_string(), "note".to_string(), "score".to_string(), "ok".to_string()],
        vec![
            vec![
                Value::Int64(1),
                Value::Utf8("a,\"b\"".to_string()),
                Value::Float64(2.5),
                Value::Bool(true),
            ],
            vec![Value::Int64(2), Value::Null, Value::Null, Value::Bool(false)],
        ],
    )
}

#[test]
fn csv_export_round_trips_through_the_reader() {
    let ds = mixed_dataset();
    let out = write(&ds, ExportFormat::Csv, "upload.json").unwrap();

    assert_eq!(out.file_name, "upload.csv");
    assert_eq!(out.mime_type, "text/csv");
    assert_eq!(
        String::from_utf8(out.bytes.clone()).unwrap(),
        "id,note,score,ok\n1,\"a,\"\"b\"\"\",2.5,True\n2,,,False\n"
    );

    let back = read(&out.file_name, &out.bytes).unwrap();
    assert_eq!(back.rows, ds.rows);
}

#[test]
fn json_export_writes_one_object_per_line() {
    let out = write(&mixed_dataset(), ExportFormat::Json, "upload.csv").unwrap();

    assert_eq!(out.file_name, "upload.json");
    assert_eq!(out.mime_type, "application/json");
    let text = String::from_utf8(out.bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], r#"{"id":1,"note":"a,\"b\"","score":2.5,"ok":true}"#);
    assert_eq!(lines[1], r#"{"id":2,"note":null,"score":null,"ok":false}"#);
}

#[test]
fn excel_export_writes_sheet1_with_header() {
    let out = write(&mixed_dataset(), ExportFormat::Excel, "upload.csv").unwrap();
    assert_eq!(out.file_name, "upload.xlsx");
    assert_eq!(
        out.mime_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let mut wb: Xlsx<_> = Xlsx::new(Cursor::new(out.bytes)).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Sheet1".to_string()]);
    let range = wb.worksheet_range("Sheet1").unwrap();
    let rows: Vec<&[Data]> = range.rows().collect();
    assert_eq!(rows[0][0], Data::String("id".to_string()));
    assert_eq!(rows[1][2], Data::Float(2.5));
    assert_eq!(rows[2][3], Data::Bool(false));
}

#[test]
fn export_of_empty_dataset_keeps_header() {
    let ds = DataSet::from_rows(vec!["a".to_string(), "b".to_string()], Vec::new());
    let out = write(&ds, ExportFormat::Csv, "empty.csv").unwrap();
    assert_eq!(out.bytes, b"a,b\n");

    let out = write(&ds, ExportFormat::Json, "empty.csv").unwrap();
    assert!(out.bytes.is_empty());
}

#[test]
fn output_names_replace_only_the_last_extension() {
    assert_eq!(
        output_file_name("report.csv.backup.csv", ExportFormat::Json),
        "report.csv.backup.json"
    );
    assert_eq!(output_file_name("noext", ExportFormat::Excel), "noext.xlsx");
}

#[test]
fn unknown_target_formats_are_rejected() {
    assert_eq!(ExportFormat::from_name("XLSX").unwrap(), ExportFormat::Excel);
    let err = ExportFormat::from_name("parquet").unwrap_err();
    assert!(matches!(err, AlchemyError::UnsupportedConversion { .. }));
}

#[test]
fn every_export_format_names_and_labels_its_download() {
    let ds = mixed_dataset();
    for format in ExportFormat::ALL {
        assert_eq!(ExportFormat::from_name(format.extension()).unwrap(), format);
        assert_eq!(ExportFormat::from_name(&format.to_string()).unwrap(), format);

        let out = write(&ds, format, "upload.csv").unwrap();
        assert_eq!(out.format, format);
        assert_eq!(out.file_name, format!("upload{}", format.extension()));
        assert_eq!(out.mime_type, format.mime_type());
        assert!(!out.bytes.is_empty());
    }
}

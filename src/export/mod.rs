//! Serialization of a [`DataSet`] into a downloadable file.
//!
//! [`write`] turns a dataset into bytes for one [`ExportFormat`] and pairs them with the
//! output file name and MIME type a download needs.

pub mod csv;
pub mod excel;
pub mod json;

use std::fmt;

use log::debug;

use crate::error::{AlchemyError, AlchemyResult};
use crate::types::DataSet;

/// Supported export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Single-sheet `.xlsx` workbook.
    Excel,
    /// Line-delimited JSON, one object per row.
    Json,
}

impl ExportFormat {
    /// All targets, in the order they are usually offered.
    pub const ALL: [ExportFormat; 3] = [Self::Csv, Self::Excel, Self::Json];

    /// Parse a target from its display name or extension (case-insensitive):
    /// `csv`, `excel`/`xlsx`, `json`.
    pub fn from_name(name: &str) -> AlchemyResult<Self> {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            "json" => Ok(Self::Json),
            _ => Err(AlchemyError::UnsupportedConversion {
                format: name.to_owned(),
            }),
        }
    }

    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Excel => ".xlsx",
            Self::Json => ".json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "CSV",
            Self::Excel => "Excel",
            Self::Json => "JSON",
        })
    }
}

/// A serialized dataset ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutput {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Derive the download name for `source_name` converted to `format`.
///
/// Only the trailing extension is replaced (`report.csv.backup.csv` → `report.csv.backup.json`);
/// a name without an extension gets one appended.
pub fn output_file_name(source_name: &str, format: ExportFormat) -> String {
    let stem = match source_name.rfind('.') {
        Some(dot) if dot > 0 && !source_name[dot..].contains(['/', '\\']) => &source_name[..dot],
        _ => source_name,
    };
    format!("{stem}{}", format.extension())
}

/// Serialize `dataset` as `format`.
///
/// # Examples
///
/// ```rust
/// use data_alchemy::export::{write, ExportFormat};
/// use data_alchemy::ingestion::read;
///
/// # fn main() -> Result<(), data_alchemy::AlchemyError> {
/// let ds = read("data.json", br#"[{"a":1},{"a":2}]"#)?;
/// let out = write(&ds, ExportFormat::Csv, "data.json")?;
/// assert_eq!(out.file_name, "data.csv");
/// assert_eq!(out.mime_type, "text/csv");
/// assert_eq!(out.bytes, b"a\n1\n2\n");
/// # Ok(())
/// # }
/// ```
pub fn write(dataset: &DataSet, format: ExportFormat, source_name: &str) -> AlchemyResult<ConversionOutput> {
    let bytes = match format {
        ExportFormat::Csv => csv::write_csv(dataset)?,
        ExportFormat::Excel => excel::write_excel(dataset)?,
        ExportFormat::Json => json::write_ndjson(dataset)?,
    };
    let file_name = output_file_name(source_name, format);
    debug!(
        "wrote {} row(s) as {format} to '{file_name}' ({} bytes)",
        dataset.row_count(),
        bytes.len()
    );

    Ok(ConversionOutput {
        format,
        bytes,
        file_name,
        mime_type: format.mime_type(),
    })
}

//! Unified ingestion entrypoint.
//!
//! Most callers should use [`read`], which decodes an uploaded file into an in-memory
//! [`crate::types::DataSet`]. The format is picked from the file-name extension only; the
//! bytes are never sniffed.

use std::path::Path;

use log::debug;

use crate::error::{AlchemyError, AlchemyResult};
use crate::types::DataSet;

use super::{csv, decode_text, excel, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects, single object, or NDJSON.
    Json,
    /// `.xlsx` workbook (first sheet).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xlsx" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `file_name` from its extension.
    ///
    /// Returns [`AlchemyError::UnsupportedFormat`] for unknown or missing extensions (`.xml`
    /// included: there is no XML reader).
    pub fn from_file_name(file_name: &str) -> AlchemyResult<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        Self::from_extension(ext).ok_or_else(|| AlchemyError::UnsupportedFormat {
            file_name: file_name.to_owned(),
            extension: if ext.is_empty() {
                String::new()
            } else {
                format!(".{}", ext.to_ascii_lowercase())
            },
        })
    }
}

/// Read an uploaded file into a [`DataSet`].
///
/// - The format comes from `file_name`'s extension (see [`IngestionFormat::from_file_name`]).
/// - Empty or whitespace-only content fails fast with [`AlchemyError::EmptyFile`].
/// - CSV and JSON must be UTF-8 (a byte-order mark is accepted).
///
/// This function is pure: it reports problems through its result and never through the
/// caller's observers.
///
/// # Examples
///
/// ```rust
/// use data_alchemy::ingestion::read;
///
/// # fn main() -> Result<(), data_alchemy::AlchemyError> {
/// let ds = read("people.csv", b"id,name\n1,Ada\n2,Grace\n")?;
/// assert_eq!(ds.row_count(), 2);
/// assert_eq!(ds.column_names(), vec!["id", "name"]);
/// # Ok(())
/// # }
/// ```
pub fn read(file_name: &str, bytes: &[u8]) -> AlchemyResult<DataSet> {
    let fmt = IngestionFormat::from_file_name(file_name)?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AlchemyError::EmptyFile);
    }

    debug!("reading '{file_name}' as {fmt:?} ({} bytes)", bytes.len());
    let ds = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_str(decode_text(bytes)?),
        IngestionFormat::Json => json::ingest_json_from_str(decode_text(bytes)?),
        IngestionFormat::Excel => excel::ingest_excel_from_bytes(bytes),
    }?;
    debug!(
        "read '{file_name}': {} row(s), {} column(s)",
        ds.row_count(),
        ds.column_count()
    );
    Ok(ds)
}

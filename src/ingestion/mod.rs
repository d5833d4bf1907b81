//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`read`] (from [`unified`]) which:
//!
//! - picks the format from the file-name extension (`.csv`, `.xlsx`, `.json`)
//! - rejects empty or whitespace-only uploads with [`crate::AlchemyError::EmptyFile`]
//! - decodes the bytes into an in-memory [`crate::types::DataSet`] with inferred column types
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`excel`]

pub mod csv;
pub mod excel;
pub mod json;
pub mod unified;

pub use unified::{read, IngestionFormat};

use std::collections::HashMap;

use crate::error::AlchemyResult;

/// Decode uploaded bytes as UTF-8 text, dropping a leading byte-order mark.
pub(crate) fn decode_text(bytes: &[u8]) -> AlchemyResult<&str> {
    let text = std::str::from_utf8(bytes)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Make header names usable as column names.
///
/// Blank names become `Unnamed: {index}`; repeated names get `.1`, `.2`, ... suffixes so that
/// every column name is unique.
pub(crate) fn unique_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::new();

    for (idx, raw) in headers.into_iter().enumerate() {
        let raw = raw.as_ref();
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw.to_owned()
        };

        let mut name = base.clone();
        while seen.contains_key(&name) {
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            name = format!("{base}.{n}");
        }
        seen.insert(name.clone(), 0);
        out.push(name);
    }
    out
}

//! `data-alchemy` turns uploaded tabular files into clean, converted downloads.
//!
//! An upload (file name + bytes) is read into an in-memory [`types::DataSet`], optionally
//! cleaned, projected and filtered, summarized, and written back out as CSV, Excel or
//! line-delimited JSON. The summary text can be handed to a hosted language model for
//! free-text cleaning advice.
//!
//! ## What you can read
//!
//! **File formats (chosen by extension, case-insensitive):**
//!
//! - **CSV**: `.csv` (malformed rows skipped, headerless retry)
//! - **JSON**: `.json` (array of objects, single object, or newline-delimited objects)
//! - **Excel**: `.xlsx` (first sheet)
//!
//! **Value types:**
//!
//! Cells are tagged [`types::Value`]s; each column gets a [`types::DataType`] inferred from
//! its cells:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//! - [`types::DataType::DateTime`] (text that parses as a date)
//!
//! Across formats, empty cells, NA markers and explicit JSON `null` map to
//! [`types::Value::Null`].
//!
//! ## Quick example: read → clean → convert
//!
//! ```rust
//! use data_alchemy::export::{write, ExportFormat};
//! use data_alchemy::ingestion::read;
//! use data_alchemy::processing::{deduplicate, fill_missing_numeric};
//! use data_alchemy::types::Value;
//!
//! # fn main() -> Result<(), data_alchemy::AlchemyError> {
//! let ds = read("data.csv", b"a,b\n1,2\n1,2\n,4\n")?;
//! assert_eq!(ds.row_count(), 3);
//!
//! let cleaned = fill_missing_numeric(&deduplicate(&ds));
//! assert_eq!(cleaned.row_count(), 2);
//! assert_eq!(cleaned.rows[1][0], Value::Float64(1.0));
//!
//! let out = write(&cleaned, ExportFormat::Csv, "data.csv")?;
//! assert_eq!(out.bytes, b"a,b\n1.0,2\n1.0,4\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Statistics and suggestions
//!
//! ```rust
//! use data_alchemy::ingestion::read;
//! use data_alchemy::summary::{render_text, summarize};
//! use data_alchemy::suggestion::suggest_or_message;
//! use data_alchemy::AlchemyResult;
//!
//! # fn main() -> Result<(), data_alchemy::AlchemyError> {
//! let ds = read("data.json", b"{\"a\":1}\n{\"a\":3}\n")?;
//! let text = render_text(&summarize(&ds));
//! assert!(text.starts_with("              a"));
//!
//! // Any `Fn(&str) -> AlchemyResult<String>` can stand in for the hosted model.
//! let offline = |_: &str| -> AlchemyResult<String> { Ok("No duplicates found.".to_string()) };
//! assert_eq!(suggest_or_message(&offline, &text), "No duplicates found.");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: extension-based reading and format-specific readers
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: de-duplication, imputation, projection, range filtering
//! - [`summary`]: descriptive statistics and their text table
//! - [`export`]: CSV / Excel / NDJSON writers, output names and MIME types
//! - [`suggestion`]: the suggestion-service seam and the Gemini client
//! - [`pipeline`]: one file's run from upload to download
//! - [`session`]: per-session uploads, renames, removals and cached summaries
//! - [`observability`]: observer hooks for pipeline outcomes
//! - [`error`]: the crate's error type

pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod session;
pub mod suggestion;
pub mod summary;
pub mod types;

pub use error::{AlchemyError, AlchemyResult};

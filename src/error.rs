use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type AlchemyResult<T> = Result<T, AlchemyError>;

/// Error type returned by reading, transforming, writing and suggesting.
///
/// This is a single error enum shared across CSV/JSON/Excel ingestion, the processing stages,
/// export and the suggestion service.
#[derive(Debug, Error)]
pub enum AlchemyError {
    /// The file name does not carry a supported extension.
    #[error("unsupported file type '{extension}' for '{file_name}'")]
    UnsupportedFormat { file_name: String, extension: String },

    /// The uploaded content is empty or whitespace-only.
    #[error("file is empty")]
    EmptyFile,

    /// No columns could be recovered from the input, even after a headerless retry.
    #[error("no columns to parse: {message}")]
    EmptyOrUnparseable { message: String },

    /// JSON input failed to parse for a reason other than trailing data.
    #[error("malformed json: {message}")]
    MalformedJson { message: String },

    /// A projection or filter referenced a column that is not in the dataset.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// A projection selected the same column more than once.
    #[error("column '{column}' selected more than once")]
    DuplicateColumn { column: String },

    /// A range filter referenced a column that is not numeric.
    #[error("column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    /// The requested export target is not one of CSV, Excel or JSON.
    #[error("unsupported conversion type '{format}'")]
    UnsupportedConversion { format: String },

    /// A session operation referenced a file that was never uploaded.
    #[error("unknown file '{file_name}'")]
    UnknownFile { file_name: String },

    /// The external suggestion service failed (network, auth, quota, empty answer).
    #[error("suggestion service error: {message}")]
    SuggestionService { message: String },

    /// Text input is not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// CSV reading or writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Excel workbook reading error.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::XlsxError),

    /// Excel workbook writing error.
    #[error("excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

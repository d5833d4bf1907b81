//! One file's run from upload to download.
//!
//! [`run_pipeline`] reads a file, applies the stages enabled in [`PipelineSteps`] in a fixed
//! order (deduplicate → fill missing → project → filter) and optionally serializes the result.
//! It depends on nothing but its arguments, so re-running it with the same input yields the
//! same output.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::AlchemyResult;
use crate::export::{self, ConversionOutput, ExportFormat};
use crate::ingestion;
use crate::observability::{PipelineContext, PipelineObserver, PipelineSeverity, PipelineStage, PipelineStats};
use crate::processing::{self, NumericRange};
use crate::summary::{self, Summary};
use crate::types::DataSet;

/// Which stages to apply. The default applies none and converts nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSteps {
    /// Drop exact duplicate rows.
    pub deduplicate: bool,
    /// Replace missing numeric values with the column mean.
    pub fill_missing_numeric: bool,
    /// Columns to keep, in order. `None` keeps every column.
    pub columns: Option<Vec<String>>,
    /// Inclusive numeric ranges; rows must satisfy all of them.
    pub ranges: BTreeMap<String, NumericRange>,
    /// Serialize the result in this format.
    pub convert_to: Option<ExportFormat>,
}

/// Options controlling reporting.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: PipelineSeverity,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: PipelineSeverity::Critical,
        }
    }
}

/// Rows shown in [`PipelineOutput::preview`].
pub const PREVIEW_ROWS: usize = 5;

/// Facts about an uploaded file, shown before any processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub file_name: String,
    /// Lower-cased extension including the dot (`.csv`), empty when there is none.
    pub extension: String,
    pub size_bytes: usize,
    pub rows: usize,
    pub columns: usize,
}

impl FileInfo {
    /// Describe an upload of `size_bytes` bytes that was read into `dataset`.
    pub fn new(file_name: &str, size_bytes: usize, dataset: &DataSet) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        Self {
            file_name: file_name.to_owned(),
            extension,
            size_bytes,
            rows: dataset.row_count(),
            columns: dataset.column_count(),
        }
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File Name: {}", self.file_name)?;
        writeln!(f, "File Type: {}", self.extension)?;
        writeln!(f, "File Size: {:.2} KB", self.size_kb())?;
        writeln!(f, "Number of Rows: {}", self.rows)?;
        write!(f, "Number of Columns: {}", self.columns)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Name the file was uploaded (and read) under.
    pub file_name: String,
    /// Name downloads are derived from; the uploaded name unless the run was renamed.
    pub output_name: String,
    /// Size and shape of the upload.
    pub info: FileInfo,
    /// The first [`PREVIEW_ROWS`] rows of [`Self::source`].
    pub preview: DataSet,
    /// The dataset as read, never modified by later stages.
    pub source: DataSet,
    /// Statistics of [`Self::source`].
    pub source_summary: Summary,
    /// Text rendering of [`Self::source_summary`], the payload for suggestions.
    pub summary_text: String,
    /// The dataset after all enabled stages.
    pub result: DataSet,
    /// Statistics of [`Self::result`].
    pub result_summary: Summary,
    /// Serialized result when [`PipelineSteps::convert_to`] was set.
    pub conversion: Option<ConversionOutput>,
}

/// Run the pipeline for one uploaded file.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` once the run completes, with row/column stats
/// - `on_failure` with the failing [`PipelineStage`] and a computed severity
/// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```rust
/// use data_alchemy::export::ExportFormat;
/// use data_alchemy::pipeline::{run_pipeline, PipelineOptions, PipelineSteps};
///
/// # fn main() -> Result<(), data_alchemy::AlchemyError> {
/// let steps = PipelineSteps {
///     deduplicate: true,
///     fill_missing_numeric: true,
///     convert_to: Some(ExportFormat::Json),
///     ..Default::default()
/// };
/// let out = run_pipeline("data.csv", b"a,b\n1,2\n1,2\n,4\n", &steps, &PipelineOptions::default())?;
/// assert_eq!(out.source.row_count(), 3);
/// assert_eq!(out.result.row_count(), 2);
///
/// let conversion = out.conversion.unwrap();
/// assert_eq!(conversion.file_name, "data.json");
/// assert_eq!(conversion.bytes, b"{\"a\":1.0,\"b\":2}\n{\"a\":1.0,\"b\":4}\n");
/// # Ok(())
/// # }
/// ```
pub fn run_pipeline(
    file_name: &str,
    bytes: &[u8],
    steps: &PipelineSteps,
    options: &PipelineOptions,
) -> AlchemyResult<PipelineOutput> {
    run_pipeline_as(file_name, file_name, bytes, steps, options)
}

/// Same as [`run_pipeline`], but the conversion is named after `output_name`.
///
/// The format is still picked from `file_name`, so renaming `a.csv` to `cleaned` or to
/// `a.json` changes only the download name (`cleaned.csv`, `a.csv` for a CSV target).
pub fn run_pipeline_as(
    file_name: &str,
    output_name: &str,
    bytes: &[u8],
    steps: &PipelineSteps,
    options: &PipelineOptions,
) -> AlchemyResult<PipelineOutput> {
    let mut stage = PipelineStage::Read;
    let result = run_stages(file_name, output_name, bytes, steps, &mut stage);

    if let Some(obs) = options.observer.as_ref() {
        let ctx = PipelineContext {
            file_name: file_name.to_owned(),
            stage,
        };
        match &result {
            Ok(out) => obs.on_success(
                &ctx,
                PipelineStats {
                    rows_in: out.source.row_count(),
                    rows_out: out.result.row_count(),
                    columns_out: out.result.column_count(),
                },
            ),
            Err(e) => {
                let sev = PipelineSeverity::for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn run_stages(
    file_name: &str,
    output_name: &str,
    bytes: &[u8],
    steps: &PipelineSteps,
    stage: &mut PipelineStage,
) -> AlchemyResult<PipelineOutput> {
    let source = ingestion::read(file_name, bytes)?;
    let info = FileInfo::new(file_name, bytes.len(), &source);
    let preview = source.head(PREVIEW_ROWS);

    *stage = PipelineStage::Summarize;
    let source_summary = summary::summarize(&source);
    let summary_text = summary::render_text(&source_summary);

    let mut result = source.clone();
    if steps.deduplicate {
        *stage = PipelineStage::Deduplicate;
        result = processing::deduplicate(&result);
    }
    if steps.fill_missing_numeric {
        *stage = PipelineStage::FillMissing;
        result = processing::fill_missing_numeric(&result);
    }
    if let Some(columns) = steps.columns.as_ref() {
        *stage = PipelineStage::Project;
        result = processing::project(&result, columns.as_slice())?;
    }
    if !steps.ranges.is_empty() {
        *stage = PipelineStage::Filter;
        result = processing::filter_ranges(&result, &steps.ranges)?;
    }

    *stage = PipelineStage::Summarize;
    let result_summary = summary::summarize(&result);

    let conversion = match steps.convert_to {
        Some(format) => {
            *stage = PipelineStage::Write;
            Some(export::write(&result, format, output_name)?)
        }
        None => None,
    };

    Ok(PipelineOutput {
        file_name: file_name.to_owned(),
        output_name: output_name.to_owned(),
        info,
        preview,
        source,
        source_summary,
        summary_text,
        result,
        result_summary,
        conversion,
    })
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue work per uploaded file.
#[derive(Clone)]
pub struct PipelineRequest {
    pub file_name: String,
    /// Download name; `None` uses [`Self::file_name`].
    pub output_name: Option<String>,
    pub bytes: Vec<u8>,
    pub steps: PipelineSteps,
    pub options: PipelineOptions,
}

impl fmt::Debug for PipelineRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineRequest")
            .field("file_name", &self.file_name)
            .field("output_name", &self.output_name)
            .field("bytes", &self.bytes.len())
            .field("steps", &self.steps)
            .field("options", &self.options)
            .finish()
    }
}

impl PipelineRequest {
    /// Execute the request by calling [`run_pipeline_as`].
    pub fn run(&self) -> AlchemyResult<PipelineOutput> {
        let output_name = self.output_name.as_deref().unwrap_or(&self.file_name);
        run_pipeline_as(&self.file_name, output_name, &self.bytes, &self.steps, &self.options)
    }
}

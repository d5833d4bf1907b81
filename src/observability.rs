//! Outcome reporting for pipeline runs.
//!
//! Library functions never log user-facing diagnostics on their own; callers attach a
//! [`PipelineObserver`] to [`crate::pipeline::PipelineOptions`] to record successes, failures
//! and alerts. [`LogObserver`] forwards everything to the `log` facade.

use std::fmt;
use std::sync::Arc;

use log::{error, info, warn};

use crate::error::AlchemyError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (bad input the user can fix, non-fatal service failures).
    Warning,
    /// Error-level event (the file's pipeline stopped).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

impl PipelineSeverity {
    /// Severity of a failed stage.
    pub fn for_error(e: &AlchemyError) -> Self {
        match e {
            AlchemyError::EmptyFile | AlchemyError::UnsupportedFormat { .. } => Self::Warning,
            AlchemyError::SuggestionService { .. } => Self::Warning,
            AlchemyError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            _ => Self::Error,
        }
    }
}

/// Pipeline stage a report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Read,
    Deduplicate,
    FillMissing,
    Project,
    Filter,
    Summarize,
    Write,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Deduplicate => "deduplicate",
            Self::FillMissing => "fill-missing",
            Self::Project => "project",
            Self::Filter => "filter",
            Self::Summarize => "summarize",
            Self::Write => "write",
        })
    }
}

/// Context about a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Name of the file being processed.
    pub file_name: String,
    /// Stage that produced the report. On success this is the last stage that ran.
    pub stage: PipelineStage,
}

/// Minimal stats reported on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Rows read from the source file.
    pub rows_in: usize,
    /// Rows left after all stages.
    pub rows_out: usize,
    /// Columns left after all stages.
    pub columns_out: usize,
}

/// Observer interface for pipeline outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called when a file's pipeline completes.
    fn on_success(&self, _ctx: &PipelineContext, _stats: PipelineStats) {}

    /// Called when a stage fails and the file's pipeline stops.
    fn on_failure(&self, _ctx: &PipelineContext, _severity: PipelineSeverity, _error: &AlchemyError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &AlchemyError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &AlchemyError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &AlchemyError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards pipeline events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        info!(
            "[pipeline][ok] file={} rows_in={} rows_out={} columns_out={}",
            ctx.file_name, stats.rows_in, stats.rows_out, stats.columns_out
        );
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &AlchemyError) {
        match severity {
            PipelineSeverity::Info | PipelineSeverity::Warning => warn!(
                "[pipeline][{:?}] file={} stage={} err={}",
                severity, ctx.file_name, ctx.stage, error
            ),
            PipelineSeverity::Error | PipelineSeverity::Critical => error!(
                "[pipeline][{:?}] file={} stage={} err={}",
                severity, ctx.file_name, ctx.stage, error
            ),
        }
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &AlchemyError) {
        error!(
            "[ALERT][pipeline][{:?}] file={} stage={} err={}",
            severity, ctx.file_name, ctx.stage, error
        );
    }
}

//! Per-user session state, passed explicitly instead of held globally.
//!
//! A [`Session`] owns the files a user uploaded together with the choices made about them
//! before processing: display names (renames), removal flags and the summary text cached
//! from the last successful run. Nothing in a session is shared with another session.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::{AlchemyError, AlchemyResult};
use crate::pipeline::{run_pipeline_as, PipelineOptions, PipelineOutput, PipelineSteps};
use crate::suggestion::{suggest_or_message, SuggestionService};

/// Text returned by [`Session::suggest`] when a file has no cached summary yet.
pub const NO_SUMMARY_MESSAGE: &str = "No data summary available.";

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Outcome of processing one file in [`Session::process_all`].
#[derive(Debug)]
pub struct FileOutcome {
    /// Name the file was uploaded under.
    pub file_name: String,
    /// Name the download is derived from (the rename, if any).
    pub display_name: String,
    pub result: AlchemyResult<PipelineOutput>,
}

/// Explicit per-session context.
#[derive(Debug, Default)]
pub struct Session {
    files: Vec<UploadedFile>,
    renames: HashMap<String, String>,
    removed: HashSet<String>,
    summaries: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add uploads to the session.
    ///
    /// Files are keyed by name: uploading a name again replaces its content but keeps the
    /// position of the first upload, and drops any summary cached for the old content.
    pub fn upload<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = UploadedFile>,
    {
        for file in files {
            match self.files.iter_mut().find(|f| f.name == file.name) {
                Some(existing) => {
                    debug!("replacing upload '{}'", file.name);
                    self.summaries.remove(&file.name);
                    *existing = file;
                }
                None => self.files.push(file),
            }
        }
    }

    /// Uploaded files in upload order, removed ones included.
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// Files that will be processed, in upload order.
    pub fn active_files(&self) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter().filter(|f| !self.removed.contains(&f.name))
    }

    fn ensure_known(&self, file_name: &str) -> AlchemyResult<()> {
        if self.files.iter().any(|f| f.name == file_name) {
            Ok(())
        } else {
            Err(AlchemyError::UnknownFile {
                file_name: file_name.to_owned(),
            })
        }
    }

    /// Download `file_name`'s conversions under `new_name`. An empty or unchanged name clears
    /// the rename. The upload's own extension still picks how it is read.
    pub fn rename(&mut self, file_name: &str, new_name: impl Into<String>) -> AlchemyResult<()> {
        self.ensure_known(file_name)?;
        let new_name = new_name.into();
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == file_name {
            self.renames.remove(file_name);
        } else {
            self.renames.insert(file_name.to_owned(), new_name.to_owned());
        }
        Ok(())
    }

    /// Name a file's conversions are downloaded under.
    pub fn display_name<'a>(&'a self, file_name: &'a str) -> &'a str {
        self.renames.get(file_name).map(String::as_str).unwrap_or(file_name)
    }

    /// Exclude a file from processing.
    pub fn remove(&mut self, file_name: &str) -> AlchemyResult<()> {
        self.ensure_known(file_name)?;
        self.removed.insert(file_name.to_owned());
        Ok(())
    }

    /// Undo [`Self::remove`].
    pub fn restore(&mut self, file_name: &str) -> AlchemyResult<()> {
        self.ensure_known(file_name)?;
        self.removed.remove(file_name);
        Ok(())
    }

    pub fn is_removed(&self, file_name: &str) -> bool {
        self.removed.contains(file_name)
    }

    /// Run the pipeline for every active file.
    ///
    /// Each file runs independently: a failing file yields an `Err` outcome and the remaining
    /// files are still processed. Files are read under their uploaded name and converted under
    /// their display name. Successful runs refresh the file's cached summary text.
    pub fn process_all(&mut self, steps: &PipelineSteps, options: &PipelineOptions) -> Vec<FileOutcome> {
        let outcomes: Vec<FileOutcome> = self
            .active_files()
            .map(|file| {
                let display_name = self.display_name(&file.name).to_owned();
                let result = run_pipeline_as(&file.name, &display_name, &file.bytes, steps, options);
                FileOutcome {
                    file_name: file.name.clone(),
                    display_name,
                    result,
                }
            })
            .collect();

        for outcome in &outcomes {
            if let Ok(out) = &outcome.result {
                self.summaries
                    .insert(outcome.file_name.clone(), out.summary_text.clone());
            }
        }
        outcomes
    }

    /// Summary text cached by the last successful run of `file_name`.
    pub fn summary_text(&self, file_name: &str) -> Option<&str> {
        self.summaries.get(file_name).map(String::as_str)
    }

    /// Ask `service` for suggestions about `file_name`'s cached summary.
    ///
    /// Never fails: without a cached summary this returns [`NO_SUMMARY_MESSAGE`], and service
    /// errors come back as message text.
    pub fn suggest(&self, file_name: &str, service: &dyn SuggestionService) -> String {
        match self.summary_text(file_name) {
            Some(summary) if !summary.is_empty() => suggest_or_message(service, summary),
            _ => NO_SUMMARY_MESSAGE.to_string(),
        }
    }
}

//! Free-text cleaning suggestions from an external language model.
//!
//! The collaborator is a plain function from summary text to suggestion text, modelled as the
//! [`SuggestionService`] trait. [`suggest_or_message`] is the contract callers display: it
//! never fails and never retries, turning service errors into readable text.
//!
//! With the `gemini` feature (on by default), [`GeminiSuggestionService`] calls Google's
//! Gemini API over blocking HTTP.

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiSuggestionService, SuggestionConfig, SuggestionConfigBuilder, API_KEY_ENV};

use log::warn;

use crate::error::{AlchemyError, AlchemyResult};

/// Something that turns a data summary into cleaning advice.
pub trait SuggestionService {
    /// Ask for suggestions about the data described by `summary_text`.
    ///
    /// Implementations make a single attempt; retrying is the caller's decision.
    fn suggest(&self, summary_text: &str) -> AlchemyResult<String>;
}

impl<F> SuggestionService for F
where
    F: Fn(&str) -> AlchemyResult<String>,
{
    fn suggest(&self, summary_text: &str) -> AlchemyResult<String> {
        self(summary_text)
    }
}

/// Build the fixed prompt sent to the model; `summary_text` is appended verbatim.
pub fn build_prompt(summary_text: &str) -> String {
    format!(
        "Using the data summary below, provide clear, actionable, and detailed data cleaning recommendations. \
         Focus on steps to remove duplicates, fill missing values, and improve overall data quality. \
         Please provide a concise understandable response, under 300 words.\n\nData Summary:\n{summary_text}"
    )
}

/// Ask `service` for suggestions, returning an error message instead of failing.
pub fn suggest_or_message(service: &dyn SuggestionService, summary_text: &str) -> String {
    match service.suggest(summary_text) {
        Ok(text) => text,
        Err(e) => {
            warn!("suggestion service failed: {e}");
            match e {
                AlchemyError::SuggestionService { message } => {
                    format!("Error calling suggestion service: {message}")
                }
                other => format!("Error calling suggestion service: {other}"),
            }
        }
    }
}

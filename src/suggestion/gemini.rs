//! Google Gemini suggestion service.
//!
//! [`GeminiSuggestionService`] sends [`super::build_prompt`] to the Gemini `generateContent`
//! REST endpoint (<https://ai.google.dev/>) and returns the first candidate's text.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AlchemyError, AlchemyResult};

use super::{build_prompt, SuggestionService};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TEMPERATURE: f32 = 0.5;
const DEFAULT_TOP_K: u32 = 2;
const DEFAULT_TOP_P: f32 = 0.5;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

/// Generation and transport settings for [`GeminiSuggestionService`].
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionConfig {
    /// Model name, e.g. `gemini-2.0-flash`.
    pub model: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    /// Upper bound on the length of the answer, in tokens.
    pub max_output_tokens: u32,
    /// Request timeout in seconds. The request is attempted once.
    pub timeout_secs: u64,
    /// Base URL for the API (useful for proxies or test servers).
    pub base_url: String,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            top_k: DEFAULT_TOP_K,
            top_p: DEFAULT_TOP_P,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl SuggestionConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SuggestionConfigBuilder {
        SuggestionConfigBuilder::default()
    }
}

/// Builder for [`SuggestionConfig`]; unset fields keep their defaults.
#[derive(Debug, Default)]
pub struct SuggestionConfigBuilder {
    config: SuggestionConfig,
}

impl SuggestionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.config.top_k = top_k;
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.config.top_p = top_p;
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.config.max_output_tokens = max_output_tokens;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn build(self) -> SuggestionConfig {
        self.config
    }
}

/// Blocking Gemini client implementing [`SuggestionService`].
///
/// # Example
///
/// ```rust,no_run
/// use data_alchemy::suggestion::{suggest_or_message, GeminiSuggestionService, SuggestionConfig};
///
/// # fn main() -> Result<(), data_alchemy::AlchemyError> {
/// let config = SuggestionConfig::builder().timeout_secs(10).build();
/// let service = GeminiSuggestionService::from_env_with_config(config)?;
/// println!("{}", suggest_or_message(&service, "count  3.0\nmean   1.5"));
/// # Ok(())
/// # }
/// ```
pub struct GeminiSuggestionService {
    api_key: String,
    config: SuggestionConfig,
    client: Client,
}

impl std::fmt::Debug for GeminiSuggestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSuggestionService")
            .field("config", &self.config)
            .field("api_key_set", &!self.api_key.is_empty())
            .finish()
    }
}

impl GeminiSuggestionService {
    /// Create a service with default configuration.
    pub fn new(api_key: impl Into<String>) -> AlchemyResult<Self> {
        Self::with_config(api_key, SuggestionConfig::default())
    }

    /// Create a service with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: SuggestionConfig) -> AlchemyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| service_error(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    /// Create a service with default configuration, reading the key from [`API_KEY_ENV`].
    pub fn from_env() -> AlchemyResult<Self> {
        Self::from_env_with_config(SuggestionConfig::default())
    }

    /// Create a service with `config`, reading the key from [`API_KEY_ENV`].
    pub fn from_env_with_config(config: SuggestionConfig) -> AlchemyResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| service_error(format!("{API_KEY_ENV} is not set")))?;
        Self::with_config(api_key, config)
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    fn call_api(&self, prompt: &str) -> AlchemyResult<String> {
        let request = GeminiRequest {
            contents: vec![Content {
                role: "user".to_owned(),
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        // {base_url}{model}:generateContent?key={api_key}
        let url = format!(
            "{}{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.api_key
        );
        debug!("requesting suggestions from model '{}'", self.config.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| service_error(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(service_error(format!("Gemini API error {status}: {body}")));
        }

        let result: GeminiResponse = response
            .json()
            .map_err(|e| service_error(format!("invalid Gemini response: {}", e.without_url())))?;

        extract_text(result)
    }
}

impl SuggestionService for GeminiSuggestionService {
    fn suggest(&self, summary_text: &str) -> AlchemyResult<String> {
        self.call_api(&build_prompt(summary_text))
    }
}

fn extract_text(response: GeminiResponse) -> AlchemyResult<String> {
    let candidate = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or_else(|| service_error("no candidates in Gemini response".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref()
        && (reason == "SAFETY" || reason == "BLOCKED")
    {
        return Err(service_error(format!("response blocked ({reason})")));
    }

    let text: String = candidate
        .content
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(service_error("empty response from Gemini API".to_string()));
    }
    Ok(text)
}

fn service_error(message: String) -> AlchemyError {
    AlchemyError::SuggestionService { message }
}

//! LLM client for title and keyword suggestion.
//!
//! Holds a ranked list of suggestion providers (local Ollama first, hosted
//! OpenAI second) and returns the first usable answer. Failures never
//! escape `analyze`; they are logged and the next provider is tried.

mod chat;
mod config;
mod prompts;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use chat::ChatCompletionsProvider;
pub use config::{
    EndpointConfig, LlmConfig, LlmProvider, DEFAULT_OLLAMA_HOST, DEFAULT_OPENAI_BASE_URL,
};
pub use prompts::SUGGESTION_SYSTEM_PROMPT;

/// Title and keywords proposed by a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmSuggestion {
    /// Absent when the model replied with an object lacking a string title.
    pub title: Option<String>,
    pub keywords: Vec<String>,
}

impl LlmSuggestion {
    /// The title, when present and non-blank.
    pub fn usable_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to LLM service
    #[error("Connection error: {0}")]
    Connection(String),
    /// API returned an error
    #[error("API error: {0}")]
    Api(String),
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response carried no content
    #[error("Empty response")]
    EmptyResponse,
}

/// A source of title/keyword suggestions.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &str;

    /// Ask for a suggestion based on OCR text.
    async fn suggest(&self, ocr_text: &str) -> Result<LlmSuggestion, LlmError>;
}

/// LLM client trying providers in order.
pub struct LlmClient {
    providers: Vec<Box<dyn SuggestionProvider>>,
    max_content_chars: usize,
}

impl LlmClient {
    /// Create a client with a provider per configured endpoint.
    pub fn new(config: &LlmConfig) -> Self {
        let mut providers: Vec<Box<dyn SuggestionProvider>> = Vec::new();

        for endpoint in config.endpoints() {
            let provider =
                ChatCompletionsProvider::new(endpoint.clone(), config.max_tokens, config.temperature);
            match provider {
                Ok(provider) => {
                    debug!(
                        "LLM provider added: {} ({}, model {})",
                        endpoint.provider, endpoint.endpoint, endpoint.model
                    );
                    providers.push(Box::new(provider));
                }
                Err(e) => warn!("Skipping {} provider: {}", endpoint.provider, e),
            }
        }

        Self {
            providers,
            max_content_chars: config.max_content_chars,
        }
    }

    /// Create a client from explicit providers, in preference order.
    pub fn with_providers(providers: Vec<Box<dyn SuggestionProvider>>) -> Self {
        Self {
            providers,
            max_content_chars: LlmConfig::default().max_content_chars,
        }
    }

    /// Whether any provider is configured.
    pub fn is_configured(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Ask each provider in turn; `None` when none is configured or all fail.
    pub async fn analyze(&self, ocr_text: &str) -> Option<LlmSuggestion> {
        if self.providers.is_empty() {
            debug!("No LLM configured, skipping analysis");
            return None;
        }

        let text = truncate_content(ocr_text, self.max_content_chars);
        for provider in &self.providers {
            match provider.suggest(text).await {
                Ok(suggestion) => {
                    info!("LLM suggestion from {}: {:?}", provider.name(), suggestion.title);
                    return Some(suggestion);
                }
                Err(e) => debug!("LLM provider {} failed: {}", provider.name(), e),
            }
        }

        None
    }
}

/// Truncate content to a maximum byte length (UTF-8 safe).
fn truncate_content(text: &str, max_chars: usize) -> &str {
    if text.len() <= max_chars {
        return text;
    }
    let mut end = max_chars;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Parse a model reply into a suggestion.
///
/// The reply must be a JSON object, optionally wrapped in a Markdown code
/// fence. `title` is kept when it is a string; `keywords` when it is an
/// array, with non-string elements rendered as JSON text.
pub fn parse_suggestion(content: &str) -> Result<LlmSuggestion, LlmError> {
    let body = strip_code_fence(content.trim());
    if body.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| LlmError::Parse("expected a JSON object".to_string()))?;

    let title = object
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);

    let keywords = match object.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(LlmSuggestion { title, keywords })
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

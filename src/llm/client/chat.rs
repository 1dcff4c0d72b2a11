//! OpenAI-compatible chat-completions provider.
//!
//! Both Ollama (`/v1`) and OpenAI speak this wire format, so one provider
//! type serves either endpoint; only the `EndpointConfig` differs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::EndpointConfig;
use super::prompts::{suggestion_user_prompt, SUGGESTION_SYSTEM_PROMPT};
use super::{parse_suggestion, LlmError, LlmSuggestion, SuggestionProvider};

/// Chat-completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat-completions response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Suggestion provider backed by one chat-completions endpoint.
pub struct ChatCompletionsProvider {
    endpoint: EndpointConfig,
    client: Client,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionsProvider {
    /// Create a provider for `endpoint`.
    pub fn new(
        endpoint: EndpointConfig,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = endpoint.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            client,
            max_tokens,
            temperature,
        })
    }

    /// Get the endpoint config.
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    fn build_request(&self, ocr_text: &str) -> ChatRequest {
        ChatRequest {
            model: self.endpoint.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SUGGESTION_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: suggestion_user_prompt(ocr_text),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }

    /// POST the request and return the first choice's message content.
    async fn call_chat(&self, ocr_text: &str) -> Result<String, LlmError> {
        let url = self.endpoint.completions_url();
        let mut request = self.client.post(&url).json(&self.build_request(ocr_text));
        if let Some(ref key) = self.endpoint.api_key {
            request = request.bearer_auth(key);
        }

        debug!("Requesting suggestion from {} ({})", self.endpoint.provider, url);
        let resp = request
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        if let Some(err) = chat.error {
            return Err(LlmError::Api(err.message));
        }

        chat.choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl SuggestionProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        self.endpoint.provider.as_str()
    }

    async fn suggest(&self, ocr_text: &str) -> Result<LlmSuggestion, LlmError> {
        let content = self.call_chat(ocr_text).await?;
        parse_suggestion(&content)
    }
}

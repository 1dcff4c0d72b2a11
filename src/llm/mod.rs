//! LLM integration for title and keyword suggestion.
//!
//! Uses a local LLM (via Ollama) when configured, falling back to a hosted
//! OpenAI model.

mod client;

pub use client::{
    parse_suggestion, ChatCompletionsProvider, EndpointConfig, LlmClient, LlmConfig, LlmError,
    LlmProvider, LlmSuggestion, SuggestionProvider, DEFAULT_OLLAMA_HOST, DEFAULT_OPENAI_BASE_URL,
    SUGGESTION_SYSTEM_PROMPT,
};

//! LLM client configuration.
//!
//! Captured once from the environment and handed to the client at
//! construction, so nothing reads env vars at call time.
//!
//! Env vars:
//! - OLLAMA_MODEL, OLLAMA_HOST, OLLAMA_API_KEY: local endpoint (preferred)
//! - OPENAI_API_KEY, OPENAI_MODEL, OPENAI_BASE_URL: hosted endpoint

use std::time::Duration;

/// Default OpenAI-compatible base URL exposed by Ollama.
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434/v1";

/// Default hosted base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Ollama ignores the key, but OpenAI-compatible clients must send one.
const DEFAULT_OLLAMA_API_KEY: &str = "ollama";

/// Fixed timeout for the local endpoint; a stalled local model should not hold up naming.
const LOCAL_TIMEOUT: Duration = Duration::from_secs(15);

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// Ollama's OpenAI-compatible API (local)
    Ollama,
    /// OpenAI API (hosted)
    OpenAI,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::OpenAI => "openai",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection settings for one chat-completions endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    pub provider: LlmProvider,
    /// Base URL; `/chat/completions` is appended.
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Request timeout; `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl EndpointConfig {
    /// Full URL of the chat-completions route.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

/// Runtime LLM configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Local endpoint, present when OLLAMA_MODEL is set.
    pub local: Option<EndpointConfig>,
    /// Hosted endpoint, present when OPENAI_API_KEY and OPENAI_MODEL are set.
    pub hosted: Option<EndpointConfig>,
    /// Maximum tokens in response
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    pub temperature: f32,
    /// Maximum bytes of OCR text sent to the model
    pub max_content_chars: usize,
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_content_chars() -> usize {
    12000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            local: None,
            hosted: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl LlmConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let local = get("OLLAMA_MODEL").map(|model| EndpointConfig {
            provider: LlmProvider::Ollama,
            endpoint: get("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            model,
            api_key: Some(
                get("OLLAMA_API_KEY").unwrap_or_else(|| DEFAULT_OLLAMA_API_KEY.to_string()),
            ),
            timeout: Some(LOCAL_TIMEOUT),
        });

        let hosted = match (get("OPENAI_API_KEY"), get("OPENAI_MODEL")) {
            (Some(api_key), Some(model)) => Some(EndpointConfig {
                provider: LlmProvider::OpenAI,
                endpoint: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                model,
                api_key: Some(api_key),
                timeout: None,
            }),
            _ => None,
        };

        Self {
            local,
            hosted,
            ..Self::default()
        }
    }

    /// Endpoints in preference order.
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointConfig> {
        self.local.iter().chain(self.hosted.iter())
    }

    /// Whether any endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.endpoints().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> LlmConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LlmConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_nothing_configured() {
        let config = config_from(&[]);
        assert!(config.local.is_none());
        assert!(config.hosted.is_none());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_ollama_defaults() {
        let config = config_from(&[("OLLAMA_MODEL", "llama3.2")]);
        let local = config.local.expect("local endpoint");
        assert_eq!(local.provider, LlmProvider::Ollama);
        assert_eq!(local.endpoint, DEFAULT_OLLAMA_HOST);
        assert_eq!(local.api_key.as_deref(), Some("ollama"));
        assert_eq!(local.timeout, Some(LOCAL_TIMEOUT));
        assert_eq!(
            local.completions_url(),
            "http://127.0.0.1:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_openai_requires_key_and_model() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-test")]);
        assert!(config.hosted.is_none());

        let config = config_from(&[("OPENAI_API_KEY", "sk-test"), ("OPENAI_MODEL", "gpt-4o-mini")]);
        let hosted = config.hosted.expect("hosted endpoint");
        assert_eq!(hosted.endpoint, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(hosted.timeout, None);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config_from(&[("OLLAMA_MODEL", "  "), ("OPENAI_MODEL", "")]);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_local_is_preferred() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OLLAMA_MODEL", "llama3.2"),
            ("OLLAMA_HOST", "http://gpu-box:11434/v1/"),
        ]);
        let order: Vec<LlmProvider> = config.endpoints().map(|e| e.provider).collect();
        assert_eq!(order, vec![LlmProvider::Ollama, LlmProvider::OpenAI]);
        assert_eq!(
            config.local.unwrap().completions_url(),
            "http://gpu-box:11434/v1/chat/completions"
        );
    }
}

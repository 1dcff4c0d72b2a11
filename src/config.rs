//! Runtime settings, read once from the environment at startup.
//!
//! A `.env` file is loaded by `main` before `Settings::from_env` runs, so
//! values there behave like regular environment variables.

use std::path::PathBuf;

use crate::llm::LlmConfig;
use crate::ocr::OcrOptions;

/// Default log level when LOG_LEVEL is unset.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// LLM endpoints and generation parameters.
    pub llm: LlmConfig,
    /// OCR language, model directory and preprocessing flags.
    pub ocr: OcrOptions,
    /// Level name as given in LOG_LEVEL (e.g. `INFO`, `debug`).
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            ocr: OcrOptions::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut ocr = OcrOptions::default();
        if let Some(lang) = get("TESSERACT_LANG") {
            ocr.language = lang;
        }
        ocr.model_path = get("OCRS_MODEL_DIR").map(PathBuf::from);

        Self {
            llm: LlmConfig::from_lookup(&lookup),
            ocr,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Tracing filter directive for this crate, e.g. `ocrname=info`.
    pub fn log_directive(&self) -> String {
        let level = match self.log_level.trim().to_ascii_lowercase().as_str() {
            "critical" | "fatal" => "error".to_string(),
            "warning" => "warn".to_string(),
            other => other.to_string(),
        };
        format!("{}={}", env!("CARGO_CRATE_NAME"), level)
    }
}

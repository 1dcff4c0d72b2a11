//! OCR backend abstraction.
//!
//! Two engines sit behind the same trait:
//! - Ocrs: pure Rust OCR engine running in-process (feature: ocr-ocrs)
//! - Tesseract: traditional OCR via command-line

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Raw extracted text, before cleaning.
    pub text: String,
    /// Which backend produced this result.
    pub backend: OcrBackendType,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl OcrResult {
    pub fn new(text: String, backend: OcrBackendType, start: Instant) -> Self {
        Self {
            text,
            backend,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Available OCR backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OcrBackendType {
    /// Pure Rust OCR engine (ocrs crate).
    Ocrs,
    /// Tesseract OCR via command-line.
    Tesseract,
}

impl OcrBackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrBackendType::Ocrs => "ocrs",
            OcrBackendType::Tesseract => "tesseract",
        }
    }
}

impl std::fmt::Display for OcrBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Get the backend type.
    fn backend_type(&self) -> OcrBackendType;

    /// Check if this backend is available (dependencies installed, models present).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Run OCR on an image file.
    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError>;
}

/// Configuration shared by the OCR backends.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Language for Tesseract (e.g., "eng", "ita").
    pub language: String,
    /// Directory holding the ocrs model files.
    pub model_path: Option<PathBuf>,
    /// Binarize the image before handing it to Tesseract.
    pub preprocess: bool,
    /// Keep a copy of the preprocessed image in the working directory.
    pub save_preprocessed: bool,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            model_path: None,
            preprocess: true,
            save_preprocessed: false,
        }
    }
}

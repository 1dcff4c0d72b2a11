//! OCR and text extraction module.
//!
//! Extracts text from images using:
//! - OCRS for pure-Rust, in-process OCR (feature: ocr-ocrs), preferred
//! - Tesseract OCR via command-line, the fallback
//!
//! `OcrOrchestrator` owns the fallback policy and cleans the output.

mod backend;
mod cleaner;
mod model_utils;
mod orchestrator;
pub mod preprocess;
mod tesseract;

#[cfg(feature = "ocr-ocrs")]
mod ocrs_backend;

pub use backend::{OcrBackend, OcrBackendType, OcrError, OcrOptions, OcrResult};
pub use cleaner::{clean_ocr_text, has_usable_text, NO_TEXT_SENTINEL};
pub use orchestrator::OcrOrchestrator;
pub use tesseract::TesseractBackend;

#[cfg(feature = "ocr-ocrs")]
pub use ocrs_backend::OcrsBackend;

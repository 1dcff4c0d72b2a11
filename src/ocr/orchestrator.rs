//! Primary-then-secondary OCR with text cleanup.
//!
//! The primary engine is tried first unless the caller forces the
//! secondary one. Any error or unavailability moves on to the next engine
//! in the chain; whatever raw text comes out is passed through the cleaner.
//! Extraction never fails: the worst case is the "no text" sentinel.

use std::path::Path;

use tracing::{debug, info, warn};

use super::backend::{OcrBackend, OcrError, OcrOptions, OcrResult};
use super::cleaner::clean_ocr_text;
use super::tesseract::TesseractBackend;

#[cfg(feature = "ocr-ocrs")]
use super::ocrs_backend::OcrsBackend;

/// Ranked OCR engines: an optional primary and an optional secondary.
pub struct OcrOrchestrator {
    primary: Option<Box<dyn OcrBackend>>,
    secondary: Option<Box<dyn OcrBackend>>,
}

impl OcrOrchestrator {
    /// Create an orchestrator from explicit backends.
    pub fn new(
        primary: Option<Box<dyn OcrBackend>>,
        secondary: Option<Box<dyn OcrBackend>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Build the default chain: ocrs (when compiled in) then Tesseract.
    pub fn from_options(options: &OcrOptions) -> Self {
        #[cfg(feature = "ocr-ocrs")]
        let primary: Option<Box<dyn OcrBackend>> =
            Some(Box::new(OcrsBackend::new(options.clone())));
        #[cfg(not(feature = "ocr-ocrs"))]
        let primary: Option<Box<dyn OcrBackend>> = None;

        let secondary: Option<Box<dyn OcrBackend>> =
            Some(Box::new(TesseractBackend::with_config(options.clone())));

        let orchestrator = Self::new(primary, secondary);
        info!("OCR chain: {}", orchestrator.describe());
        orchestrator
    }

    /// Backends to try, in order.
    fn chain(&self, force_secondary: bool) -> impl Iterator<Item = &dyn OcrBackend> {
        let primary = if force_secondary {
            None
        } else {
            self.primary.as_deref()
        };
        primary.into_iter().chain(self.secondary.as_deref())
    }

    /// Human-readable chain description, e.g. `ocrs -> tesseract`.
    pub fn describe(&self) -> String {
        let names: Vec<String> = self
            .chain(false)
            .map(|b| b.backend_type().to_string())
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(" -> ")
        }
    }

    /// Run raw OCR through the chain, stopping at the first success.
    pub fn extract_raw(
        &self,
        image_path: &Path,
        force_secondary: bool,
    ) -> Result<OcrResult, OcrError> {
        let mut last_error: Option<OcrError> = None;

        for backend in self.chain(force_secondary) {
            if !backend.is_available() {
                debug!(
                    "OCR backend {} not available ({})",
                    backend.backend_type(),
                    backend.availability_hint()
                );
                last_error = Some(OcrError::BackendNotAvailable(backend.availability_hint()));
                continue;
            }

            match backend.ocr_image(image_path) {
                Ok(result) => {
                    debug!(
                        "OCR succeeded with {} backend in {}ms",
                        result.backend, result.processing_time_ms
                    );
                    return Ok(result);
                }
                Err(e) => {
                    warn!("OCR backend {} failed: {}", backend.backend_type(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            OcrError::BackendNotAvailable("No OCR backends available".to_string())
        }))
    }

    /// Extract and clean the text of an image. Never fails.
    pub fn extract(&self, image_path: &Path, force_secondary: bool) -> String {
        let raw = match self.extract_raw(image_path, force_secondary) {
            Ok(result) => result.text,
            Err(e) => {
                debug!("No OCR text for {}: {}", image_path.display(), e);
                String::new()
            }
        };
        clean_ocr_text(&raw)
    }
}

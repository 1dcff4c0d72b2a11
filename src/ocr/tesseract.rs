//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text extraction.
//! This is the general-purpose fallback engine.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tempfile::TempDir;
use tracing::{debug, warn};

use super::backend::{OcrBackend, OcrBackendType, OcrError, OcrOptions, OcrResult};
use super::model_utils::check_binary;
use super::preprocess;

/// Tesseract OCR backend.
pub struct TesseractBackend {
    config: OcrOptions,
}

impl TesseractBackend {
    /// Create a new Tesseract backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: OcrOptions::default(),
        }
    }

    /// Create a new Tesseract backend with custom configuration.
    pub fn with_config(config: OcrOptions) -> Self {
        Self { config }
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }

    /// Binarize the image into `temp_dir`, falling back to the original on failure.
    fn prepare_input(&self, image_path: &Path, temp_dir: &Path) -> PathBuf {
        if !self.config.preprocess {
            return image_path.to_path_buf();
        }

        match preprocess::preprocess_to_file(image_path, temp_dir) {
            Ok(processed) => {
                if self.config.save_preprocessed {
                    self.save_copy(image_path, &processed);
                }
                processed
            }
            Err(e) => {
                warn!("Preprocessing {} failed, using original: {}", image_path.display(), e);
                image_path.to_path_buf()
            }
        }
    }

    /// Keep the preprocessed image in the working directory for inspection.
    fn save_copy(&self, image_path: &Path, processed: &Path) {
        let dest = PathBuf::from(preprocess::preprocessed_file_name(image_path));
        match std::fs::copy(processed, &dest) {
            Ok(_) => debug!("Saved preprocessed image to {}", dest.display()),
            Err(e) => warn!("Could not save preprocessed image {}: {}", dest.display(), e),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Tesseract
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract")
    }

    fn availability_hint(&self) -> String {
        if !check_binary("tesseract") {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();

        let temp_dir = TempDir::new()?;
        let input = self.prepare_input(image_path, temp_dir.path());
        let text = self.run_tesseract(&input)?;

        Ok(OcrResult::new(text, OcrBackendType::Tesseract, start))
    }
}

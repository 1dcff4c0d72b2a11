//! Shared utilities for OCR backends.
//!
//! Provides common functionality for:
//! - Locating OCR model files on disk
//! - Checking for CLI tool availability

// Model lookup is only reached by the ocrs backend.
#![cfg_attr(not(feature = "ocr-ocrs"), allow(dead_code))]

use std::path::{Path, PathBuf};

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Configuration for model directory management.
pub struct ModelDirConfig {
    /// Subdirectory name under data_dir (e.g., "ocrs").
    pub subdir: &'static str,
    /// Required model files to check for presence.
    pub required_files: &'static [&'static str],
}

impl ModelDirConfig {
    /// Get the default model directory for this backend.
    pub fn default_dir(&self) -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join(self.subdir)
            .join("models")
    }

    /// Get standard candidate directories to search for models.
    pub fn candidate_dirs(&self) -> Vec<PathBuf> {
        [
            dirs::data_dir().map(|d| d.join(self.subdir).join("models")),
            dirs::home_dir().map(|d| d.join(format!(".{}", self.subdir)).join("models")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Check if a directory contains all required model files.
    pub fn has_required_files(&self, dir: &Path) -> bool {
        self.required_files
            .iter()
            .all(|file| dir.join(file).exists())
    }
}

/// Find the model directory.
///
/// An explicitly configured directory is the only one considered; otherwise
/// the standard locations are searched in order.
pub fn find_model_dir(config_path: Option<&Path>, model_config: &ModelDirConfig) -> Option<PathBuf> {
    match config_path {
        Some(path) => model_config
            .has_required_files(path)
            .then(|| path.to_path_buf()),
        None => model_config
            .candidate_dirs()
            .into_iter()
            .find(|dir| model_config.has_required_files(dir)),
    }
}

/// Format availability hint for a model-based backend.
pub fn model_availability_hint(
    config_path: Option<&Path>,
    model_config: &ModelDirConfig,
    backend_name: &str,
) -> String {
    if let Some(path) = find_model_dir(config_path, model_config) {
        return format!("{} models found at {:?}", backend_name, path);
    }
    let expected = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| model_config.default_dir());
    format!(
        "{} models not found. Place {} in {:?} or set OCRS_MODEL_DIR",
        backend_name,
        model_config.required_files.join(", "),
        expected
    )
}

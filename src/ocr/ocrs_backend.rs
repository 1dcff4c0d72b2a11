//! In-process OCR with the ocrs engine.
//!
//! Needs `text-detection.rten` and `text-recognition.rten`, looked up in
//! `OCRS_MODEL_DIR` when set, else in the platform data dir or `~/.ocrs`.
//! The engine is built once per process and shared by every call.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use tracing::debug;

use super::backend::{OcrBackend, OcrBackendType, OcrError, OcrOptions, OcrResult};
use super::model_utils::{find_model_dir, model_availability_hint, ModelDirConfig};
use super::preprocess::{load_image, resize_to_max_width, MAX_WIDTH};

const DETECTION_MODEL: &str = "text-detection.rten";
const RECOGNITION_MODEL: &str = "text-recognition.rten";

const MODELS: ModelDirConfig = ModelDirConfig {
    subdir: "ocrs",
    required_files: &[DETECTION_MODEL, RECOGNITION_MODEL],
};

static ENGINE: OnceLock<OcrEngine> = OnceLock::new();

/// Located model files.
struct ModelFiles {
    detection: PathBuf,
    recognition: PathBuf,
}

impl ModelFiles {
    fn locate(model_dir: Option<&Path>) -> Result<Self, OcrError> {
        let dir = find_model_dir(model_dir, &MODELS).ok_or_else(|| {
            OcrError::ModelNotFound(model_availability_hint(model_dir, &MODELS, "ocrs"))
        })?;
        Ok(Self {
            detection: dir.join(DETECTION_MODEL),
            recognition: dir.join(RECOGNITION_MODEL),
        })
    }

    fn build_engine(&self) -> Result<OcrEngine, OcrError> {
        let load = |path: &Path| {
            Model::load_file(path).map_err(|e| {
                OcrError::OcrFailed(format!("Cannot load model {}: {}", path.display(), e))
            })
        };

        debug!("Loading ocrs models from {}", self.detection.display());
        OcrEngine::new(OcrEngineParams {
            detection_model: Some(load(&self.detection)?),
            recognition_model: Some(load(&self.recognition)?),
            ..Default::default()
        })
        .map_err(|e| OcrError::OcrFailed(format!("Cannot start ocrs engine: {}", e)))
    }
}

/// Primary OCR engine, compiled in with the `ocr-ocrs` feature.
pub struct OcrsBackend {
    options: OcrOptions,
}

impl OcrsBackend {
    pub fn new(options: OcrOptions) -> Self {
        Self { options }
    }

    fn engine(&self) -> Result<&'static OcrEngine, OcrError> {
        if let Some(engine) = ENGINE.get() {
            return Ok(engine);
        }
        let engine = ModelFiles::locate(self.options.model_path.as_deref())?.build_engine()?;
        // A concurrent initializer may have won; either engine is equivalent.
        Ok(ENGINE.get_or_init(|| engine))
    }

    fn recognize(engine: &OcrEngine, image_path: &Path) -> Result<String, OcrError> {
        let rgb = resize_to_max_width(load_image(image_path)?, MAX_WIDTH).into_rgb8();
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
            .map_err(|e| OcrError::ImageError(format!("Unsupported image layout: {}", e)))?;
        let input = engine
            .prepare_input(source)
            .map_err(|e| OcrError::OcrFailed(e.to_string()))?;
        engine
            .get_text(&input)
            .map_err(|e| OcrError::OcrFailed(e.to_string()))
    }
}

impl OcrBackend for OcrsBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Ocrs
    }

    fn is_available(&self) -> bool {
        ENGINE.get().is_some() || ModelFiles::locate(self.options.model_path.as_deref()).is_ok()
    }

    fn availability_hint(&self) -> String {
        model_availability_hint(self.options.model_path.as_deref(), &MODELS, "ocrs")
    }

    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let engine = self.engine()?;
        let text = Self::recognize(engine, image_path)?;
        Ok(OcrResult::new(text, OcrBackendType::Ocrs, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with_models_in(dir: &Path) -> OcrsBackend {
        OcrsBackend::new(OcrOptions {
            model_path: Some(dir.to_path_buf()),
            ..OcrOptions::default()
        })
    }

    #[test]
    fn test_unavailable_without_models() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend_with_models_in(dir.path());

        assert!(!backend.is_available());
        assert!(backend.availability_hint().contains(DETECTION_MODEL));
    }

    #[test]
    fn test_missing_models_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend_with_models_in(dir.path());

        let err = backend.ocr_image(&dir.path().join("shot.png")).unwrap_err();
        assert!(matches!(err, OcrError::ModelNotFound(_)));
    }

    #[test]
    fn test_partial_models_are_not_enough() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DETECTION_MODEL), b"").unwrap();

        assert!(ModelFiles::locate(Some(dir.path())).is_err());
    }
}

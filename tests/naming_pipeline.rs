//! End-to-end naming with scripted OCR and LLM stand-ins.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use chrono::Local;
use tempfile::TempDir;

use ocrname::llm::{parse_suggestion, LlmClient, LlmError, LlmSuggestion, SuggestionProvider};
use ocrname::naming::{
    build_final_filename, is_filename_in_desired_format, rename_with_suffix, Keywords,
    NamingEngine,
};
use ocrname::ocr::{OcrBackend, OcrBackendType, OcrError, OcrOrchestrator, OcrResult};

/// OCR backend returning fixed text, or failing when `text` is `None`.
struct FixedOcr {
    kind: OcrBackendType,
    text: Option<&'static str>,
}

impl OcrBackend for FixedOcr {
    fn backend_type(&self) -> OcrBackendType {
        self.kind
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        String::new()
    }

    fn ocr_image(&self, _image_path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        match self.text {
            Some(text) => Ok(OcrResult::new(text.to_string(), self.kind, start)),
            None => Err(OcrError::OcrFailed("scripted failure".to_string())),
        }
    }
}

fn backend(kind: OcrBackendType, text: Option<&'static str>) -> Option<Box<dyn OcrBackend>> {
    Some(Box::new(FixedOcr { kind, text }))
}

fn ocr(primary: Option<&'static str>, secondary: Option<&'static str>) -> OcrOrchestrator {
    OcrOrchestrator::new(
        backend(OcrBackendType::Ocrs, primary),
        backend(OcrBackendType::Tesseract, secondary),
    )
}

/// Provider replying with fixed content.
struct FixedReply(&'static str);

#[async_trait]
impl SuggestionProvider for FixedReply {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn suggest(&self, _ocr_text: &str) -> Result<LlmSuggestion, LlmError> {
        parse_suggestion(self.0)
    }
}

fn llm_replying(content: &'static str) -> LlmClient {
    let provider: Box<dyn SuggestionProvider> = Box::new(FixedReply(content));
    LlmClient::with_providers(vec![provider])
}

fn no_llm() -> LlmClient {
    LlmClient::with_providers(Vec::new())
}

fn image(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"not really an image").unwrap();
    path
}

fn today() -> String {
    Local::now().format("%Y%m%d").to_string()
}

#[tokio::test]
async fn empty_ocr_without_llm_uses_file_stem() {
    let dir = TempDir::new().unwrap();
    let path = image(&dir, "diagram.png");
    let engine = NamingEngine::new(ocr(Some("@@@"), Some("")), no_llm());

    let result = engine.generate(&path).await;
    assert_eq!(result.title, format!("diagram {}", today()));
    assert!(result.keywords.to_list().contains(&"png".to_string()));
    assert!(!result.filename.is_empty());
}

#[tokio::test]
async fn total_ocr_failure_still_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = image(&dir, "receipt.jpg");
    let engine = NamingEngine::new(ocr(None, None), no_llm());

    let result = engine.generate(&path).await;
    assert!(result.title.starts_with("receipt "));
    assert_eq!(result.keywords, Keywords::Joined("jpg, receipt".to_string()));
}

#[tokio::test]
async fn heuristic_uses_first_ocr_line() {
    let dir = TempDir::new().unwrap();
    let path = image(&dir, "shot.png");
    let engine = NamingEngine::new(ocr(Some("Service Mesh Diagram\nenvoy"), None), no_llm());

    let result = engine.generate(&path).await;
    assert_eq!(result.title, format!("Service Mesh Diagram {}", today()));
    assert_eq!(
        result.keywords,
        Keywords::Joined("diagram, mesh, png, service".to_string())
    );
}

#[tokio::test]
async fn force_secondary_reads_tesseract_text() {
    let dir = TempDir::new().unwrap();
    let path = image(&dir, "shot.png");
    let engine = NamingEngine::new(ocr(Some("Primary Text"), Some("Secondary Text")), no_llm())
        .with_force_secondary(true);

    let result = engine.generate(&path).await;
    assert!(result.title.starts_with("Secondary Text "));
}

#[tokio::test]
async fn llm_title_is_adopted_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = image(&dir, "shot.png");
    let llm = llm_replying(r#"{"title": "Service Mesh Overview", "keywords": ["api", "mesh"]}"#);
    let engine = NamingEngine::new(ocr(Some("Service Mesh"), None), llm);

    let result = engine.generate(&path).await;
    assert_eq!(result.title, "Service Mesh Overview");
    assert_eq!(
        result.keywords,
        Keywords::List(vec!["api".to_string(), "mesh".to_string()])
    );
    assert_eq!(result.filename, "shot.png");
}

#[tokio::test]
async fn titleless_llm_reply_falls_back_to_heuristics() {
    let dir = TempDir::new().unwrap();
    let path = image(&dir, "shot.png");
    let llm = llm_replying(r#"{"keywords": ["x"]}"#);
    let engine = NamingEngine::new(ocr(Some("Invoice 42"), None), llm);

    let result = engine.generate(&path).await;
    assert_eq!(result.title, format!("Invoice 42 {}", today()));
    assert!(matches!(result.keywords, Keywords::Joined(_)));
}

#[tokio::test]
async fn analyze_then_rename_produces_detectable_name() {
    let dir = TempDir::new().unwrap();
    let path = image(&dir, "IMG_0042.png");
    let llm = llm_replying(
        r#"{"title": "Quarterly Sales", "keywords": ["sales", "q3", "report", "north", "east"]}"#,
    );
    let engine = NamingEngine::new(ocr(Some("Q3 Sales"), None), llm);

    let result = engine.generate(&path).await;
    let new_name = build_final_filename(&result.title, &result.keywords.to_list(), ".png");
    assert!(new_name.starts_with("Quarterly Sales [sales, q3, report] - "));

    let target = rename_with_suffix(&path, &new_name).unwrap();
    assert!(target.exists());
    assert!(!path.exists());
    assert!(is_filename_in_desired_format(&target));
}

#[tokio::test]
async fn heuristic_keywords_survive_synthesis() {
    let dir = TempDir::new().unwrap();
    let path = image(&dir, "diagram.png");
    let engine = NamingEngine::new(ocr(None, None), no_llm());

    let result = engine.generate(&path).await;
    let new_name = build_final_filename(&result.title, &result.keywords.to_list(), ".png");
    assert!(new_name.starts_with(&format!("diagram {} [diagram, png] - ", today())));
    assert!(is_filename_in_desired_format(&new_name));
}

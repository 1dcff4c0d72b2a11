//! OCR → LLM → heuristic naming pipeline.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::llm::LlmClient;
use crate::ocr::{has_usable_text, OcrOrchestrator};

/// Longest heuristic title base, in characters.
const MAX_TITLE_BASE_CHARS: usize = 80;

/// Used when a path has no usable stem.
const FALLBACK_STEM: &str = "image";

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern should compile"));

/// Keywords as produced by either naming path.
///
/// The LLM path yields a list; the heuristic path yields one
/// comma-separated string. Both serialize in their natural JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Keywords {
    List(Vec<String>),
    Joined(String),
}

impl Keywords {
    /// Normalize to a list, splitting the joined form on commas.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Keywords::List(items) => items.clone(),
            Keywords::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords::List(Vec::new())
    }
}

/// Result of naming one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingResult {
    pub title: String,
    pub keywords: Keywords,
    /// The original basename on the LLM path, a heuristic name otherwise.
    pub filename: String,
}

/// Produces a title, keywords and filename for an image.
pub struct NamingEngine {
    ocr: OcrOrchestrator,
    llm: LlmClient,
    force_secondary: bool,
}

impl NamingEngine {
    pub fn new(ocr: OcrOrchestrator, llm: LlmClient) -> Self {
        Self {
            ocr,
            llm,
            force_secondary: false,
        }
    }

    /// Skip the primary OCR backend.
    pub fn with_force_secondary(mut self, force_secondary: bool) -> Self {
        self.force_secondary = force_secondary;
        self
    }

    /// Name `image_path`. Never fails.
    pub async fn generate(&self, image_path: &Path) -> NamingResult {
        let ocr_text = self.ocr.extract(image_path, self.force_secondary);

        if let Some(suggestion) = self.llm.analyze(&ocr_text).await {
            if let Some(title) = suggestion.usable_title() {
                info!("Using LLM title: {}", title);
                return NamingResult {
                    title: title.to_string(),
                    keywords: Keywords::List(suggestion.keywords.clone()),
                    filename: base_name(image_path),
                };
            }
            debug!("LLM reply had no title, falling back to heuristics");
        }

        let result = heuristic_result(image_path, &ocr_text, Local::now().date_naive());
        info!("Using heuristic title: {}", result.title);
        result
    }
}

/// Derive a name from OCR text alone, dated `today`.
pub fn heuristic_result(image_path: &Path, ocr_text: &str, today: NaiveDate) -> NamingResult {
    let title_base = first_text_line(ocr_text)
        .map(|line| line.chars().take(MAX_TITLE_BASE_CHARS).collect::<String>())
        .filter(|line| !line.trim().is_empty())
        .unwrap_or_else(|| file_stem(image_path));

    let ext = image_path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut keywords: BTreeSet<String> = NON_WORD
        .split(&title_base)
        .filter(|token| token.chars().count() > 2)
        .map(str::to_lowercase)
        .collect();
    if !ext.is_empty() {
        keywords.insert(ext.clone());
    }
    let keywords = keywords.into_iter().collect::<Vec<_>>().join(", ");

    let date = today.format("%Y%m%d").to_string();
    let dotted_ext = if ext.is_empty() {
        String::new()
    } else {
        format!(".{}", ext)
    };

    NamingResult {
        title: format!("{} {}", title_base, date),
        filename: format!("{} [{}] {}{}", title_base, keywords, date, dotted_ext),
        keywords: Keywords::Joined(keywords),
    }
}

/// First non-blank line of cleaned OCR text, without its bullet.
fn first_text_line(ocr_text: &str) -> Option<String> {
    if !has_usable_text(ocr_text) {
        return None;
    }
    ocr_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.strip_prefix("- ").unwrap_or(line).trim().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_STEM.to_string())
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

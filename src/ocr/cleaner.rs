//! Normalization of raw OCR output.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Returned when no line of the OCR output survives cleaning.
pub const NO_TEXT_SENTINEL: &str = "No text detected";

/// Everything except ASCII alphanumerics, whitespace and `. , ; : -`.
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s.,;:\-]").expect("valid regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Turn raw OCR output into a bullet list of readable lines.
///
/// Lines shorter than two characters after cleaning are dropped. When
/// nothing survives the result is [`NO_TEXT_SENTINEL`].
pub fn clean_ocr_text(raw: &str) -> String {
    let lines: Vec<String> = raw
        .lines()
        .filter_map(|line| {
            let stripped = NOISE.replace_all(line, "");
            let collapsed = WHITESPACE_RUN.replace_all(stripped.trim(), " ");
            let cleaned = collapsed.trim();
            (cleaned.chars().count() > 1).then(|| format!("- {}", cleaned))
        })
        .collect();

    let cleaned = if lines.is_empty() {
        NO_TEXT_SENTINEL.to_string()
    } else {
        lines.join("\n")
    };

    debug!("OCR text extracted:\n{}", raw);
    debug!("OCR text cleaned:\n{}", cleaned);
    cleaned
}

/// Whether cleaned OCR text carries anything usable.
pub fn has_usable_text(cleaned: &str) -> bool {
    let trimmed = cleaned.trim();
    !trimmed.is_empty() && trimmed != NO_TEXT_SENTINEL
}

//! Prompts for title and keyword suggestion.

/// System instruction shared by every chat-completions provider.
pub const SUGGESTION_SYSTEM_PROMPT: &str = r#"You name image files from the text found inside them. Reply with valid JSON only, no prose and no code fences, using exactly this structure:

{"title": "...", "keywords": ["...", "..."]}

Rules:
1. The title has at most 8 words and contains only letters, digits and spaces.
2. Prefer rephrasing the first line of the OCR text into the title.
3. Select at most 5 keywords, the most relevant ones for finding the image later.
4. Keywords are short, lowercase, and contain only letters, digits and hyphens."#;

/// User message carrying the OCR text.
pub fn suggestion_user_prompt(ocr_text: &str) -> String {
    format!("OCR_TEXT:\n{}", ocr_text)
}

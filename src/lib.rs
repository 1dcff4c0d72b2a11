//! ocrname - name image files from the text inside them.
//!
//! Text is read with OCR, turned into a title and keywords by an LLM when
//! one is configured, and by heuristics otherwise. The result becomes a
//! filename of the form `<title> [<keywords>] - <YYYYMMDDHHMMSS>.<ext>`.

pub mod cli;
pub mod config;
pub mod llm;
pub mod naming;
pub mod ocr;

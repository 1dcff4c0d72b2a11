//! Filename synthesis.
//!
//! `<title> [<kw1>, <kw2>, <kw3>] - <YYYYMMDDHHMMSS><.ext>`
//!
//! Keywords are capped at three to keep names short, even though the model
//! is asked for up to five.

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Maximum number of keyword slugs embedded in a filename.
pub const MAX_FILENAME_KEYWORDS: usize = 3;

/// Used when the title is empty or slugifies to nothing.
const DEFAULT_TITLE: &str = "image";

/// `YYYYMMDDHHMMSS`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_-]+").expect("unsafe-run pattern should compile"));

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("multi-space pattern should compile"));

/// Reduce text to alphanumerics, `_`, `-` and single spaces.
pub fn slugify(text: &str) -> String {
    let replaced = UNSAFE_RUN.replace_all(text.trim(), " ");
    MULTI_SPACE.replace_all(&replaced, " ").trim().to_string()
}

/// The parts a final filename is assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameComponents {
    pub safe_title: String,
    pub keyword_slugs: Vec<String>,
    pub timestamp: String,
}

impl FilenameComponents {
    /// Sanitize the title and keywords and stamp them with `now`.
    ///
    /// Keyword slugs are deduplicated ignoring case (the first spelling
    /// wins), empty slugs are skipped, and at most
    /// [`MAX_FILENAME_KEYWORDS`] are kept.
    pub fn derive<S: AsRef<str>>(title: &str, keywords: &[S], now: NaiveDateTime) -> Self {
        let mut safe_title = slugify(title);
        if safe_title.is_empty() {
            safe_title = DEFAULT_TITLE.to_string();
        }

        let mut seen = HashSet::new();
        let mut keyword_slugs = Vec::new();
        for keyword in keywords {
            let slug = slugify(keyword.as_ref());
            if slug.is_empty() || !seen.insert(slug.to_lowercase()) {
                continue;
            }
            keyword_slugs.push(slug);
            if keyword_slugs.len() >= MAX_FILENAME_KEYWORDS {
                break;
            }
        }

        Self {
            safe_title,
            keyword_slugs,
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Assemble the filename with `extension` (dot added if missing).
    pub fn assemble(&self, extension: &str) -> String {
        let core = if self.keyword_slugs.is_empty() {
            format!("{} - {}", self.safe_title, self.timestamp)
        } else {
            format!(
                "{} [{}] - {}",
                self.safe_title,
                self.keyword_slugs.join(", "),
                self.timestamp
            )
        };
        format!("{}{}", core, dotted_extension(extension))
    }
}

fn dotted_extension(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{}", extension)
    }
}

/// Build the final filename using the current local time.
pub fn build_final_filename<S: AsRef<str>>(title: &str, keywords: &[S], extension: &str) -> String {
    build_final_filename_at(title, keywords, extension, Local::now().naive_local())
}

/// Build the final filename for a given moment.
pub fn build_final_filename_at<S: AsRef<str>>(
    title: &str,
    keywords: &[S],
    extension: &str,
    now: NaiveDateTime,
) -> String {
    FilenameComponents::derive(title, keywords, now).assemble(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn moment() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 15)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Hello, World!  "), "Hello World");
        assert_eq!(slugify("a/b\\c:d"), "a b c d");
        assert_eq!(slugify("keep_under-score"), "keep_under-score");
        assert_eq!(slugify("tabs\tand\nnewlines"), "tabs and newlines");
        assert_eq!(slugify("€€€"), "");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in ["Service  Mesh: Diagram!", " x--y__z ", "Q3 / 2024 (draft)", "ça va"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_build_with_keywords() {
        let name = build_final_filename_at(
            "Service Mesh Diagram",
            &["api", "mesh", "diagram", "extra", "overflow"],
            ".png",
            moment(),
        );
        assert_eq!(name, "Service Mesh Diagram [api, mesh, diagram] - 20251115123045.png");
    }

    #[test]
    fn test_build_without_keywords() {
        let empty: [&str; 0] = [];
        let name = build_final_filename_at("Invoice", &empty, ".pdf", moment());
        assert_eq!(name, "Invoice - 20251115123045.pdf");
    }

    #[test]
    fn test_empty_title_defaults_to_image() {
        let name = build_final_filename_at("", &["x"], ".jpg", moment());
        assert_eq!(name, "image [x] - 20251115123045.jpg");

        let name = build_final_filename_at("???", &["x"], ".jpg", moment());
        assert!(name.starts_with("image [x]"));
    }

    #[test]
    fn test_extension_gets_dot() {
        let name = build_final_filename_at("Photo", &["a"], "jpeg", moment());
        assert!(name.ends_with("20251115123045.jpeg"));
    }

    #[test]
    fn test_keywords_deduped_and_capped() {
        let components = FilenameComponents::derive(
            "t",
            &["API", "api!", "API", "", "  ", "mesh", "api", "grid", "late"],
            moment(),
        );
        assert_eq!(components.keyword_slugs, vec!["API", "mesh", "grid"]);
    }

    #[test]
    fn test_case_variants_take_one_slot() {
        let components = FilenameComponents::derive("t", &["API", "api", "Api", "mesh"], moment());
        assert_eq!(components.keyword_slugs, vec!["API", "mesh"]);

        let name = build_final_filename_at("t", &["Mesh!", "mesh", "MESH", "grid"], ".png", moment());
        assert_eq!(name, "t [Mesh, grid] - 20251115123045.png");
    }

    #[test]
    fn test_keyword_cap_holds_for_long_input() {
        let keywords: Vec<String> = (0..50).map(|i| format!("kw{}", i)).collect();
        let components = FilenameComponents::derive("t", &keywords, moment());
        assert_eq!(components.keyword_slugs.len(), MAX_FILENAME_KEYWORDS);
        assert_eq!(components.keyword_slugs, vec!["kw0", "kw1", "kw2"]);
    }

    #[test]
    fn test_timestamp_is_fourteen_digits() {
        let components = FilenameComponents::derive("t", &["a"], moment());
        assert_eq!(components.timestamp.len(), 14);
        assert!(components.timestamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_build_uses_current_time() {
        let name = build_final_filename("Now", &["a"], ".png");
        assert!(name.starts_with("Now [a] - "));
        assert!(name.ends_with(".png"));
    }
}

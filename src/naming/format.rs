//! Detection of files that already carry a synthesized name.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// `<title>[ [<keywords>]] - <14 digits>.<ext>`
static DESIRED_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.+?(?: \[[^\]]+\])? - [0-9]{14}\.[^.]+$")
        .expect("desired-format pattern should compile")
});

/// Whether the basename of `path` already matches the synthesized pattern.
///
/// Only the final path component is checked. A rename collision suffix
/// (`..._1.png`) does not match, so such files are processed again.
pub fn is_filename_in_desired_format(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| DESIRED_FORMAT.is_match(name))
}

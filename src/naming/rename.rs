//! In-place renaming with collision suffixes.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while renaming.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Source file not found: {0}")]
    SourceMissing(PathBuf),

    #[error("Invalid target name: {0:?}")]
    InvalidName(String),

    #[error("Failed to rename {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// First free path for `file_name` inside `dir`.
///
/// Returns `dir/file_name` when free, otherwise probes `<stem>_1<ext>`,
/// `<stem>_2<ext>`, ... until an unused name is found.
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(file_name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let ext = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Rename `source` to `new_name` in its own directory, never overwriting.
///
/// Returns the path actually used, which carries a `_N` suffix when
/// `new_name` was taken.
pub fn rename_with_suffix(source: &Path, new_name: &str) -> Result<PathBuf, RenameError> {
    if new_name.is_empty() || new_name.contains('/') || new_name.contains('\\') {
        return Err(RenameError::InvalidName(new_name.to_string()));
    }
    if !source.is_file() {
        return Err(RenameError::SourceMissing(source.to_path_buf()));
    }

    let dir = source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let target = unique_destination(dir, new_name);
    if target != dir.join(new_name) {
        debug!("{} exists, using {}", new_name, target.display());
    }

    std::fs::rename(source, &target).map_err(|e| RenameError::Io {
        from: source.to_path_buf(),
        to: target.clone(),
        source: e,
    })?;

    info!("Renamed {} -> {}", source.display(), target.display());
    Ok(target)
}

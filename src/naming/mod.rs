//! Image naming: pipeline, filename synthesis, format detection and renaming.
//!
//! `NamingEngine` turns an image into a title and keywords. The synthesizer
//! turns those into `<title> [<kw>] - <timestamp><.ext>`, which the format
//! detector recognizes so already-named files can be skipped.

mod engine;
mod filename;
mod format;
mod rename;

pub use engine::{heuristic_result, Keywords, NamingEngine, NamingResult};
pub use filename::{
    build_final_filename, build_final_filename_at, slugify, FilenameComponents,
    MAX_FILENAME_KEYWORDS, TIMESTAMP_FORMAT,
};
pub use format::is_filename_in_desired_format;
pub use rename::{rename_with_suffix, unique_destination, RenameError};

//! CLI command implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::llm::LlmClient;
use crate::naming::{
    build_final_filename, is_filename_in_desired_format, rename_with_suffix, NamingEngine,
    NamingResult,
};
use crate::ocr::OcrOrchestrator;

const EXIT_SUCCESS: u8 = 0;
/// Input path does not exist.
const EXIT_INPUT_MISSING: u8 = 2;
/// Rename was requested and failed.
const EXIT_RENAME_FAILED: u8 = 3;
/// File already carries a synthesized name.
const EXIT_ALREADY_NAMED: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "ocrname")]
#[command(about = "Name image files from the text inside them")]
#[command(version)]
pub struct Cli {
    /// Image to analyze
    pub image: PathBuf,

    /// Process the file even if its name is already in the generated format
    #[arg(short, long)]
    pub force: bool,

    /// Rename the file to the generated name
    #[arg(short, long)]
    pub rename: bool,

    /// Save the preprocessed image to the working directory
    #[arg(short = 's', long = "save-preprocessed-img")]
    pub save_preprocessed_img: bool,

    /// Use Tesseract even when the in-process OCR engine is available
    #[arg(short, long)]
    pub tesseract: bool,

    /// Enable verbose logging and pretty-printed output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    requests_verbose(std::env::args().skip(1))
}

/// Whether `args` set `--verbose`, alone or in a short-flag cluster like `-rv`.
fn requests_verbose<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for arg in args {
        let arg = arg.as_ref();
        if arg == "--" {
            return false;
        }
        if arg == "--verbose" {
            return true;
        }
        // Every short flag is a switch, so a cluster is just a set of letters.
        if let Some(cluster) = arg.strip_prefix('-') {
            if !cluster.starts_with('-') && cluster.contains('v') {
                return true;
            }
        }
    }
    false
}

/// JSON document written to stdout.
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    result: NamingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    renamed_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rename_error: Option<String>,
}

/// Run the CLI.
pub async fn run(settings: Settings) -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let code = execute(cli, settings).await?;
    Ok(ExitCode::from(code))
}

/// Analyze (and optionally rename) one image, returning the exit code.
async fn execute(cli: Cli, mut settings: Settings) -> anyhow::Result<u8> {
    if !cli.image.exists() {
        eprintln!("Error: {} does not exist", cli.image.display());
        return Ok(EXIT_INPUT_MISSING);
    }

    if !cli.force && is_filename_in_desired_format(&cli.image) {
        eprintln!(
            "Warning: {} is already named; use --force to process it again",
            cli.image.display()
        );
        return Ok(EXIT_ALREADY_NAMED);
    }

    settings.ocr.save_preprocessed = cli.save_preprocessed_img;
    debug!(
        "OCR language {}, LLM configured: {}",
        settings.ocr.language,
        settings.llm.is_configured()
    );

    let engine = NamingEngine::new(
        OcrOrchestrator::from_options(&settings.ocr),
        LlmClient::new(&settings.llm),
    )
    .with_force_secondary(cli.tesseract);

    let result = engine.generate(&cli.image).await;
    debug!("Naming result: {:?}", result);

    let mut report = Report {
        result,
        renamed_to: None,
        rename_error: None,
    };
    let mut exit = EXIT_SUCCESS;

    if cli.rename {
        match rename_image(&cli.image, &report.result) {
            Ok(target) => report.renamed_to = Some(target.display().to_string()),
            Err(e) => {
                warn!("Rename failed: {}", e);
                report.rename_error = Some(e.to_string());
                exit = EXIT_RENAME_FAILED;
            }
        }
    }

    println!("{}", render(&report, cli.verbose)?);
    Ok(exit)
}

fn rename_image(
    image: &Path,
    result: &NamingResult,
) -> Result<PathBuf, crate::naming::RenameError> {
    let ext = image
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let new_name = build_final_filename(&result.title, &result.keywords.to_list(), &ext);
    debug!("Final filename: {}", new_name);
    rename_with_suffix(image, &new_name)
}

/// Compact JSON, or pretty JSON with sorted keys when verbose.
fn render(report: &Report, pretty: bool) -> anyhow::Result<String> {
    if !pretty {
        return Ok(serde_json::to_string(report)?);
    }
    let value = serde_json::to_value(report)?;
    let sorted: BTreeMap<String, serde_json::Value> = match value {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        other => return Ok(serde_json::to_string_pretty(&other)?),
    };
    Ok(serde_json::to_string_pretty(&sorted)?)
}

//! ocrname - name image files from the text inside them.

use std::process::ExitCode;

use ocrname::cli;
use ocrname::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present (before anything else); its values win
    let _ = dotenvy::dotenv_override();

    let settings = Settings::from_env();

    // Initialize logging based on verbosity; RUST_LOG wins when set
    let default_filter = if cli::is_verbose() {
        "ocrname=debug".to_string()
    } else {
        settings.log_directive()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run(settings).await
}

#![deny(warnings)]

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use twentyq_app::config::AppConfig;
use twentyq_app::console::{Console, OutputFormat};
use twentyq_app::controller::GameController;
use twentyq_core::AppInfo;
use twentyq_core::game::serialization::CatalogManifest;
use twentyq_core::model::catalog::Catalog;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("TWENTYQ_BUILD_DATE"),
    ")"
);

/// Twenty-questions guessing game on the terminal.
#[derive(Debug, Parser)]
#[command(name = "twentyq", author, version, long_version = LONG_VERSION, about)]
struct Cli {
    /// Catalog JSON file to play with instead of the built-in one.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Score a candidate needs before it is proposed [env: TWENTYQ_CONFIRM_THRESHOLD].
    #[arg(long, value_name = "SCORE")]
    confirm_threshold: Option<i32>,

    /// Questions to ask before the first guess [env: TWENTYQ_MIN_QUESTIONS].
    #[arg(long, value_name = "COUNT")]
    min_questions: Option<usize>,

    /// How long the win screen stays up before a new game starts.
    #[arg(long, value_name = "MS", default_value_t = twentyq_app::config::DEFAULT_WIN_DISPLAY_MS)]
    win_display_ms: u64,

    /// Screen output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the active catalog as JSON to FILE and exit.
    #[arg(long, value_name = "FILE")]
    export_catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut config = AppConfig::from_env();
    config.catalog = cli.catalog;
    config.win_display = Duration::from_millis(cli.win_display_ms);
    if let Some(threshold) = cli.confirm_threshold {
        config.engine.confirm_threshold = threshold;
    }
    if let Some(min_questions) = cli.min_questions {
        config.engine.min_questions_before_guess = min_questions;
    }

    if let Some(path) = cli.export_catalog {
        let catalog: std::sync::Arc<Catalog> = config
            .load_catalog()
            .context("loading catalog for export")?;
        CatalogManifest::to_file(&catalog, &path)
            .with_context(|| format!("writing catalog to {}", path.display()))?;
        println!("Catalog written to {}", path.display());
        return Ok(());
    }

    let controller = GameController::from_config(&config).context("loading catalog")?;
    tracing::info!(
        app = AppInfo::name(),
        version = AppInfo::version(),
        candidates = controller.engine().candidates().len(),
        questions = controller.engine().question_count(),
        "starting session"
    );

    let format = match cli.format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
    };
    let mut console = Console::new(controller, format, config.poll_interval);
    let stdin = io::stdin();
    let summary = console.run(stdin.lock(), io::stdout().lock())?;
    tracing::info!(
        inputs = summary.inputs,
        wins = summary.wins,
        restarts = summary.restarts,
        "session ended"
    );

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;

use twentyq_bench::config::{BenchmarkConfig, ResolvedOutputs};
use twentyq_bench::logging::init_logging;
use twentyq_bench::simulation::SimulationRunner;

/// Batch simulation harness for the guessing engine.
#[derive(Debug, Parser)]
#[command(
    name = "twentyq-bench",
    author,
    version,
    about = "Deterministic 20 Questions session harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of rounds to play.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the RNG seed for responder noise.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no sessions are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.sessions.rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.sessions.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let responder_count = config.responders.len();
    let run_id = config.run_id.clone();
    let rounds = config.sessions.rounds;

    println!(
        "Loaded configuration '{run_id}' with {responder_count} responder{} ({rounds} round{})",
        if responder_count == 1 { "" } else { "s" },
        if rounds == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SimulationRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}': {} rounds, {} sessions -> {} rows at {}",
        summary.rounds,
        summary.sessions_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}

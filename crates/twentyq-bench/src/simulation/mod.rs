use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use twentyq_bot::{
    NoisyResponder, OracleResponder, Responder, SessionOutcome, SessionResult, play_session,
};
use twentyq_core::error::EngineError;
use twentyq_core::game::engine::Engine;
use twentyq_core::game::serialization::load_catalog;
use twentyq_core::model::catalog::{Catalog, CatalogError};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{
    BenchmarkConfig, ResolvedOutputs, ResponderConfig, ResponderKindConfig, ValidationError,
};

/// Plays every candidate as the secret, for every responder, once per round.
pub struct SimulationRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    catalog: Arc<Catalog>,
    responders: Vec<ResponderBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub rounds: usize,
    pub sessions_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let catalog = match config.catalog.as_ref() {
            Some(path) => Arc::new(load_catalog(path)?),
            None => Arc::new(Catalog::standard()),
        };
        let responders = ResponderBlueprint::from_configs(&config.responders)?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            catalog,
            responders,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Execute the simulation, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.sessions.seed.unwrap_or(0));
        let mut engine = Engine::new(
            Arc::clone(&self.catalog),
            self.config.engine.engine_config(),
        );
        let mut analytics = AnalyticsCollector::new(&self.config, &self.catalog);
        let pool = self.catalog.pool_size();
        let mut rows_written = 0usize;

        for round in 0..self.config.sessions.rounds {
            let base_seed = rng.next_u64();

            for (responder_index, blueprint) in self.responders.iter().enumerate() {
                for secret in 0..pool {
                    let session_seed =
                        base_seed.wrapping_add((responder_index * pool + secret) as u64);
                    let mut responder = blueprint.instantiate(session_seed);
                    let outcome = play_session(&mut engine, responder.as_mut(), secret)?;

                    if self.logging_enabled && tracing::enabled!(Level::INFO) {
                        event!(
                            target: "twentyq_bench::session",
                            Level::INFO,
                            run_id = %self.config.run_id,
                            round = round as u32,
                            responder = %blueprint.name,
                            secret = secret as u32,
                            won = outcome.result == SessionResult::Won,
                            questions = outcome.questions_asked as u32,
                            rejected = outcome.rejected_guesses as u32,
                        );
                    }

                    analytics.record(&blueprint.name, &outcome)?;
                    self.write_row(&mut writer, round, blueprint, session_seed, &outcome)?;
                    rows_written += 1;
                }
            }
        }

        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            rounds: self.config.sessions.rounds,
            sessions_played: rows_written,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn write_row(
        &self,
        writer: &mut BufWriter<File>,
        round: usize,
        blueprint: &ResponderBlueprint,
        session_seed: u64,
        outcome: &SessionOutcome,
    ) -> Result<(), RunnerError> {
        let name_of = |index: usize| {
            self.catalog
                .candidates()
                .get(index)
                .map(|c| c.name.clone())
                .unwrap_or_default()
        };

        let row = SessionLogRow {
            run_id: self.config.run_id.clone(),
            session_id: format!("R{round:05}_{}_S{:02}", blueprint.name, outcome.secret),
            round,
            responder: blueprint.name.clone(),
            kind: blueprint.kind,
            session_seed,
            secret: name_of(outcome.secret),
            result: outcome.result,
            guessed: outcome.guessed.map(&name_of),
            questions_asked: outcome.questions_asked,
            rejected_guesses: outcome.rejected_guesses,
            exhausted: outcome.exhausted,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SessionLogRow {
    run_id: String,
    session_id: String,
    round: usize,
    responder: String,
    kind: ResponderKindConfig,
    session_seed: u64,
    secret: String,
    result: SessionResult,
    guessed: Option<String>,
    questions_asked: usize,
    rejected_guesses: usize,
    exhausted: bool,
}

struct ResponderBlueprint {
    name: String,
    kind: ResponderKindConfig,
    flip_rate: f64,
}

impl ResponderBlueprint {
    fn from_configs(configs: &[ResponderConfig]) -> Result<Vec<Self>, RunnerError> {
        configs
            .iter()
            .map(|config| -> Result<Self, RunnerError> {
                let flip_rate = match config.kind {
                    ResponderKindConfig::Oracle => 0.0,
                    ResponderKindConfig::Noisy => config.flip_rate()?,
                };
                Ok(Self {
                    name: config.name.clone(),
                    kind: config.kind,
                    flip_rate,
                })
            })
            .collect()
    }

    fn instantiate(&self, seed: u64) -> Box<dyn Responder> {
        match self.kind {
            ResponderKindConfig::Oracle => Box::new(OracleResponder::new()),
            ResponderKindConfig::Noisy => Box::new(NoisyResponder::new(self.flip_rate, seed)),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("engine rejected a call: {0}")]
    Engine(#[from] EngineError),
    #[error("invalid responder: {0}")]
    Responder(#[from] ValidationError),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

use crate::error::EngineError;
use crate::game::config::EngineConfig;
use crate::model::answer::Answer;
use crate::model::candidate::{Candidate, CandidatePool};
use crate::model::catalog::Catalog;
use crate::model::question::Question;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Asking,
    ConfirmingGuess { candidate: usize },
    Finished,
    Won { candidate: usize },
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Asking => "asking",
            Phase::ConfirmingGuess { .. } => "confirming a guess",
            Phase::Finished => "finished",
            Phase::Won { .. } => "won",
        }
    }
}

/// Belief state for one guessing session.
///
/// Reading accessors never mutate; every mutating operation checks its phase
/// (and any index it needs) before touching state, so a failed call leaves
/// the session exactly as it was.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
    config: EngineConfig,
    pool: CandidatePool,
    question_index: usize,
    phase: Phase,
    running: bool,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        let pool = CandidatePool::from_profiles(catalog.candidates());
        let mut engine = Self {
            catalog,
            config,
            pool,
            question_index: 0,
            phase: Phase::Asking,
            running: true,
        };
        engine.reset();
        engine
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(Catalog::standard()), EngineConfig::default())
    }

    pub fn reset(&mut self) {
        self.pool.reset();
        self.question_index = 0;
        self.phase = Phase::Asking;
        self.running = true;
        debug!(
            target: "twentyq_core::engine",
            pool = self.pool.len(),
            questions = self.catalog.question_count(),
            "session reset"
        );
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn question_count(&self) -> usize {
        self.catalog.question_count()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.pool.as_slice()
    }

    pub fn score(&self, index: usize) -> Result<i32, EngineError> {
        self.candidate(index).map(Candidate::score)
    }

    pub fn candidate_name(&self, index: usize) -> Result<&str, EngineError> {
        self.candidate(index).map(Candidate::name)
    }

    fn candidate(&self, index: usize) -> Result<&Candidate, EngineError> {
        self.pool.get(index).ok_or(EngineError::OutOfRange {
            index,
            len: self.pool.len(),
        })
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Asking => self.catalog.bank().question(self.question_index).ok(),
            _ => None,
        }
    }

    pub fn candidate_in_confirmation(&self) -> Option<usize> {
        match self.phase {
            Phase::ConfirmingGuess { candidate } => Some(candidate),
            _ => None,
        }
    }

    pub fn won_candidate(&self) -> Option<usize> {
        match self.phase {
            Phase::Won { candidate } => Some(candidate),
            _ => None,
        }
    }

    /// Current leader among candidates still in play, without side effects.
    pub fn best_candidate(&self) -> Option<usize> {
        self.pool.best()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pool.is_exhausted()
    }

    pub fn answer(&mut self, response: Answer) -> Result<Phase, EngineError> {
        if self.phase != Phase::Asking {
            return Err(self.invalid_phase("answer"));
        }

        let weights = self
            .catalog
            .bank()
            .weights(self.question_index, response)?;
        self.pool.apply_weights(weights);
        trace!(
            target: "twentyq_core::engine",
            question = self.question_index,
            answer = response.as_str(),
            ?weights,
            "scores updated"
        );
        self.question_index += 1;

        let guess = self.pool.best().filter(|&best| {
            self.pool
                .get(best)
                .is_some_and(|c| self.config.allows_guess(self.question_index, c.score()))
        });

        self.phase = match guess {
            Some(candidate) => Phase::ConfirmingGuess { candidate },
            None if self.question_index >= self.question_count() => Phase::Finished,
            None => Phase::Asking,
        };

        debug!(
            target: "twentyq_core::engine",
            answered = self.question_index,
            phase = self.phase.as_str(),
            guess = ?guess,
            "answer recorded"
        );
        Ok(self.phase)
    }

    pub fn abort(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Asking {
            return Err(self.invalid_phase("abort"));
        }
        self.running = false;
        debug!(target: "twentyq_core::engine", answered = self.question_index, "session aborted");
        Ok(())
    }

    pub fn confirm_accept(&mut self) -> Result<Phase, EngineError> {
        let Phase::ConfirmingGuess { candidate } = self.phase else {
            return Err(self.invalid_phase("confirm_accept"));
        };

        self.pool.eliminate(candidate);
        self.phase = Phase::Won { candidate };
        debug!(
            target: "twentyq_core::engine",
            candidate,
            answered = self.question_index,
            "guess accepted"
        );
        Ok(self.phase)
    }

    /// Rejecting a guess moves on to the next question. The best guess is
    /// not re-derived until the next answer.
    pub fn confirm_reject(&mut self) -> Result<Phase, EngineError> {
        let Phase::ConfirmingGuess { candidate } = self.phase else {
            return Err(self.invalid_phase("confirm_reject"));
        };

        self.pool.eliminate(candidate);
        self.question_index += 1;
        self.phase = if self.question_index >= self.question_count() {
            Phase::Finished
        } else {
            Phase::Asking
        };
        debug!(
            target: "twentyq_core::engine",
            candidate,
            answered = self.question_index,
            remaining = self.pool.remaining(),
            phase = self.phase.as_str(),
            "guess rejected"
        );
        Ok(self.phase)
    }

    pub fn acknowledge_win_and_restart(&mut self) -> Result<(), EngineError> {
        if !matches!(self.phase, Phase::Won { .. }) {
            return Err(self.invalid_phase("acknowledge_win_and_restart"));
        }
        self.reset();
        Ok(())
    }

    fn invalid_phase(&self, operation: &'static str) -> EngineError {
        EngineError::InvalidPhase {
            operation,
            phase: self.phase,
        }
    }
}

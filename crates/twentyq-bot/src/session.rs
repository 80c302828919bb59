use crate::responder::{Responder, ResponderContext};
use serde::Serialize;
use tracing::debug;
use twentyq_core::error::EngineError;
use twentyq_core::game::engine::{Engine, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionResult {
    Won,
    OutOfQuestions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub secret: usize,
    pub result: SessionResult,
    /// Candidate the engine guessed correctly, if any.
    pub guessed: Option<usize>,
    /// Questions actually answered. Questions skipped by a rejected guess
    /// are not counted.
    pub questions_asked: usize,
    pub rejected_guesses: usize,
    pub exhausted: bool,
}

/// Plays one session from a fresh reset until the engine wins or runs out
/// of questions. The engine is left in its terminal phase.
pub fn play_session(
    engine: &mut Engine,
    responder: &mut dyn Responder,
    secret: usize,
) -> Result<SessionOutcome, EngineError> {
    let pool = engine.candidates().len();
    if secret >= pool {
        return Err(EngineError::OutOfRange {
            index: secret,
            len: pool,
        });
    }

    engine.reset();
    let mut questions_asked = 0usize;
    let mut rejected_guesses = 0usize;

    loop {
        match engine.phase() {
            Phase::Asking => {
                let question_index = engine.question_index();
                let answer = {
                    let question = engine.catalog().bank().question(question_index)?;
                    responder.answer(&ResponderContext {
                        secret,
                        question_index,
                        question,
                    })
                };
                engine.answer(answer)?;
                questions_asked += 1;
            }
            Phase::ConfirmingGuess { candidate } => {
                if responder.confirm(secret, candidate) {
                    engine.confirm_accept()?;
                } else {
                    rejected_guesses += 1;
                    engine.confirm_reject()?;
                }
            }
            Phase::Won { candidate } => {
                let outcome = SessionOutcome {
                    secret,
                    result: SessionResult::Won,
                    guessed: Some(candidate),
                    questions_asked,
                    rejected_guesses,
                    exhausted: engine.is_exhausted(),
                };
                debug!(
                    target: "twentyq_bot::session",
                    secret,
                    questions = outcome.questions_asked,
                    rejected_guesses,
                    responder = responder.kind().as_str(),
                    "session won"
                );
                return Ok(outcome);
            }
            Phase::Finished => {
                let outcome = SessionOutcome {
                    secret,
                    result: SessionResult::OutOfQuestions,
                    guessed: None,
                    questions_asked,
                    rejected_guesses,
                    exhausted: engine.is_exhausted(),
                };
                debug!(
                    target: "twentyq_bot::session",
                    secret,
                    questions = outcome.questions_asked,
                    rejected_guesses,
                    responder = responder.kind().as_str(),
                    "session ran out of questions"
                );
                return Ok(outcome);
            }
        }
    }
}

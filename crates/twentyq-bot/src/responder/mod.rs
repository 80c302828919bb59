mod noisy;
mod oracle;

pub use noisy::NoisyResponder;
pub use oracle::OracleResponder;

use twentyq_core::model::answer::Answer;
use twentyq_core::model::question::Question;

/// What a simulated player sees when asked a question.
pub struct ResponderContext<'a> {
    /// Pool index of the candidate the player is thinking of.
    pub secret: usize,
    pub question_index: usize,
    pub question: &'a Question,
}

/// A simulated player holding a secret candidate.
pub trait Responder: Send {
    /// Answer the current question.
    fn answer(&mut self, ctx: &ResponderContext) -> Answer;

    /// Accept or reject the engine's proposed guess.
    fn confirm(&mut self, secret: usize, candidate: usize) -> bool {
        secret == candidate
    }

    fn kind(&self) -> ResponderKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderKind {
    Oracle,
    Noisy,
}

impl ResponderKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResponderKind::Oracle => "oracle",
            ResponderKind::Noisy => "noisy",
        }
    }
}

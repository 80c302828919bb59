use super::{Responder, ResponderContext, ResponderKind};
use tracing::trace;
use twentyq_core::model::answer::Answer;

/// Answers every question the way the catalog says the secret would.
///
/// "Yes" when the secret gains more from a yes than from a no; a question
/// that does not separate the two answers gets "No".
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleResponder;

impl OracleResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn truthful_answer(ctx: &ResponderContext) -> Answer {
        let yes = ctx.question.weights(Answer::Yes).get(ctx.secret).copied();
        let no = ctx.question.weights(Answer::No).get(ctx.secret).copied();
        match (yes, no) {
            (Some(yes), Some(no)) => Answer::from_bool(yes > no),
            _ => Answer::No,
        }
    }
}

impl Responder for OracleResponder {
    fn answer(&mut self, ctx: &ResponderContext) -> Answer {
        let answer = Self::truthful_answer(ctx);
        trace!(
            target: "twentyq_bot::oracle",
            secret = ctx.secret,
            question = ctx.question_index,
            answer = answer.as_str(),
        );
        answer
    }

    fn kind(&self) -> ResponderKind {
        ResponderKind::Oracle
    }
}

use super::{OracleResponder, Responder, ResponderContext, ResponderKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use twentyq_core::model::answer::Answer;

/// Truthful player who misreads a question now and then.
///
/// Each question answer is flipped with probability `flip_rate`. Guess
/// confirmations stay truthful.
#[derive(Debug, Clone)]
pub struct NoisyResponder {
    flip_rate: f64,
    rng: StdRng,
    flips: usize,
}

impl NoisyResponder {
    pub fn new(flip_rate: f64, seed: u64) -> Self {
        let flip_rate = if flip_rate.is_finite() {
            flip_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            flip_rate,
            rng: StdRng::seed_from_u64(seed),
            flips: 0,
        }
    }

    pub fn flip_rate(&self) -> f64 {
        self.flip_rate
    }

    /// Number of answers flipped so far.
    pub fn flips(&self) -> usize {
        self.flips
    }
}

impl Responder for NoisyResponder {
    fn answer(&mut self, ctx: &ResponderContext) -> Answer {
        let truthful = OracleResponder::truthful_answer(ctx);
        if self.rng.gen_bool(self.flip_rate) {
            self.flips += 1;
            debug!(
                target: "twentyq_bot::noisy",
                secret = ctx.secret,
                question = ctx.question_index,
                truthful = truthful.as_str(),
                "answer flipped"
            );
            truthful.flipped()
        } else {
            truthful
        }
    }

    fn kind(&self) -> ResponderKind {
        ResponderKind::Noisy
    }
}

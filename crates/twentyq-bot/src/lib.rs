pub mod responder;
pub mod session;

pub use responder::{NoisyResponder, OracleResponder, Responder, ResponderContext, ResponderKind};
pub use session::{SessionOutcome, SessionResult, play_session};

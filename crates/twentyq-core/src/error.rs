use crate::game::engine::Phase;
use core::fmt;

/// Misuse of the engine or the question bank by its caller.
///
/// Neither variant is recoverable: both mean the collaborator lost track of
/// the engine's phase or indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    OutOfRange { index: usize, len: usize },
    InvalidPhase { operation: &'static str, phase: Phase },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::OutOfRange { index, len } => {
                write!(f, "index {index} is out of range (length {len})")
            }
            EngineError::InvalidPhase { operation, phase } => {
                write!(f, "{operation} is not valid while {}", phase.as_str())
            }
        }
    }
}

impl std::error::Error for EngineError {}

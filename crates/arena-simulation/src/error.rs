use arena_mechanics::MechError;

use crate::state::MatchStatus;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the match controller, orchestrator and brackets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A configuration was rejected at setup.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A finished match cannot be mutated any further.
    #[error("match already finished")]
    MatchAlreadyFinished,

    /// The match has not been started yet.
    #[error("match has not been started")]
    NotStarted,

    /// The requested transition is not allowed from the current status.
    #[error("cannot {action} while match is {status}")]
    InvalidTransition {
        /// What was attempted.
        action: &'static str,
        /// The status the match was in.
        status: MatchStatus,
    },

    /// No preset exists with the given name.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A mechanics-level error.
    #[error(transparent)]
    Mechanics(#[from] MechError),
}

use fleet_sim::SimError;
use thiserror::Error;

/// Why a command was refused.  A refused command never changes state.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("a run is already active")]
    AlreadyRunning,

    #[error("an interactive run is active; stop it before analyzing")]
    Busy,

    #[error("no run is active")]
    NotRunning,

    #[error("speed factor must be a positive number, got {0}")]
    InvalidSpeed(f64),

    #[error("analysis needs at least one repetition")]
    InvalidRepetitions,

    #[error("engine refused to start: {0}")]
    Sim(#[from] SimError),

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name:   &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub type ControlResult<T> = Result<T, ControlError>;

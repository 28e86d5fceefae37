use fleet_core::{Cell, CellKind, FleetError};
use fleet_grid::GridError;
use thiserror::Error;

/// Reasons an engine refuses to start.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("a run needs at least one agent")]
    NoAgents,

    #[error("map has no {0:?} cells")]
    MissingZone(CellKind),

    #[error("start cell {0} is not traversable")]
    InvalidStart(Cell),

    #[error("start cell {0} is assigned to more than one agent")]
    DuplicateStart(Cell),

    #[error("{requested} agents requested but the map has only {available} free start cells")]
    NotEnoughStarts { requested: usize, available: usize },

    #[error("{got} start cells given for {expected} agents")]
    StartCountMismatch { expected: usize, got: usize },

    #[error("speed factor must be a positive number, got {0}")]
    InvalidSpeed(f64),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("configuration error: {0}")]
    Config(#[from] FleetError),
}

pub type SimResult<T> = Result<T, SimError>;
